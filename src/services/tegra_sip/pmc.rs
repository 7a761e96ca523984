// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Tegra210 power management controller registers relevant to the SiP calls.

use crate::blocklist::{
    BlockReason::{FirmwareScratch, SecureOnly},
    BlockedRange, Blocklist,
};

/// Physical base address of the PMC register window.
pub const TEGRA_PMC_BASE: usize = 0x7000_E400;
/// Size in bytes of the PMC register window.
pub const TEGRA_PMC_SIZE: usize = 0xC00;

const PMC_DPD_ENABLE_0: usize = 0x24;
const PMC_SCRATCH1: usize = 0x54;
const PMC_CRYPTO_OP_0: usize = 0xF4;
const PMC_SCRATCH31: usize = 0x118;
const PMC_SCRATCH33: usize = 0x120;
const PMC_SCRATCH40: usize = 0x13C;
const PMC_SCRATCH42: usize = 0x144;
const PMC_SCRATCH43: usize = 0x22C;
const PMC_SCRATCH48: usize = 0x240;
const PMC_SCRATCH50: usize = 0x248;
const PMC_SCRATCH51: usize = 0x24C;
const PMC_TSC_MULT_0: usize = 0x2B4;
const PMC_STICKY_BIT: usize = 0x2C0;
const PMC_FUSE_CONTROL_0: usize = 0x450;
const PMC_SCRATCH56: usize = 0x600;
const PMC_SCRATCH57: usize = 0x604;

/// PMC registers which the normal world may neither read nor write.
///
/// The scratch registers hold the warmboot and secure-boot state that firmware depends on across
/// suspend, and the rest control hardware only EL3 or secure software may touch.
pub const PMC_BLOCKLIST: Blocklist = Blocklist::new(&[
    BlockedRange::register(PMC_DPD_ENABLE_0, SecureOnly),
    BlockedRange::register(PMC_SCRATCH1, FirmwareScratch),
    BlockedRange::register(PMC_CRYPTO_OP_0, SecureOnly),
    BlockedRange::span(PMC_SCRATCH31, PMC_SCRATCH33, FirmwareScratch),
    BlockedRange::register(PMC_SCRATCH40, FirmwareScratch),
    BlockedRange::register(PMC_SCRATCH42, FirmwareScratch),
    BlockedRange::span(PMC_SCRATCH43, PMC_SCRATCH48, FirmwareScratch),
    BlockedRange::span(PMC_SCRATCH50, PMC_SCRATCH51, FirmwareScratch),
    BlockedRange::register(PMC_TSC_MULT_0, SecureOnly),
    BlockedRange::register(PMC_STICKY_BIT, SecureOnly),
    BlockedRange::register(PMC_FUSE_CONTROL_0, SecureOnly),
    BlockedRange::span(PMC_SCRATCH56, PMC_SCRATCH57, FirmwareScratch),
]);

const _: () = assert!(PMC_BLOCKLIST.is_well_formed(TEGRA_PMC_SIZE));

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mmio::RegisterOffset;

    fn blocked(offset: u64) -> bool {
        PMC_BLOCKLIST
            .lookup(RegisterOffset::new(offset, TEGRA_PMC_SIZE).unwrap())
            .is_some()
    }

    #[test]
    fn every_listed_register_is_blocked() {
        let registers = [
            0x24, 0x54, 0xF4, 0x118, 0x11C, 0x120, 0x13C, 0x144, 0x22C, 0x230, 0x234, 0x238,
            0x23C, 0x240, 0x248, 0x24C, 0x2B4, 0x2C0, 0x450, 0x600, 0x604,
        ];
        for offset in registers {
            assert!(blocked(offset), "{offset:#x} should be blocked");
        }
    }

    #[test]
    fn neighbours_are_allowed() {
        for offset in [0x0, 0x20, 0x28, 0x50, 0x58, 0x114, 0x124, 0x244, 0x250, 0x608, 0xBFC] {
            assert!(!blocked(offset), "{offset:#x} should be allowed");
        }
    }

    #[test]
    fn reasons() {
        let reason = |offset| {
            PMC_BLOCKLIST
                .lookup(RegisterOffset::new(offset, TEGRA_PMC_SIZE).unwrap())
                .unwrap()
                .reason
        };
        assert_eq!(reason(0x54), FirmwareScratch);
        assert_eq!(reason(0x230), FirmwareScratch);
        assert_eq!(reason(0x450), SecureOnly);
        assert_eq!(reason(0x24), SecureOnly);
    }
}
