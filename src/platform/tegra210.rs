// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! NVIDIA Tegra210.

use super::Platform;
use crate::{
    logger::{self, LockedWriter, inmemory::MemoryLogger},
    mmio::MmioWindow,
    plat_params::{PlatParams, PlatParamsCell},
    services::tegra_sip::{
        TegraSip,
        pmc::{TEGRA_PMC_BASE, TEGRA_PMC_SIZE},
    },
};
use core::ptr::NonNull;
use log::info;

const LOG_BUFFER_SIZE: usize = 0x1000;

/// Logs are kept in memory, where a debugger can find them.
static LOG_BUFFER: LockedWriter<MemoryLogger<LOG_BUFFER_SIZE>> =
    LockedWriter::new(MemoryLogger::new());

static PLAT_PARAMS: PlatParamsCell = PlatParamsCell::new();

/// The Tegra210 platform.
pub struct Tegra210;

impl Platform for Tegra210 {
    type LogSinkImpl = &'static LockedWriter<MemoryLogger<LOG_BUFFER_SIZE>>;
    type PlatformServiceImpl = TegraSip<'static, MmioWindow>;

    unsafe fn init(_arg0: u64, arg1: u64, _arg2: u64, _arg3: u64) {
        logger::init(&LOG_BUFFER).expect("Failed to initialise logger");

        // SAFETY: Our caller promised that `arg1` is either null or the address of the parameter
        // block from BL2.
        let params = unsafe { PlatParams::from_bl2_address(arg1) };
        let params = PLAT_PARAMS.set(params);
        info!(
            "EMC table base {:#x} size {:#x}",
            params.emc_table_base, params.emc_table_size
        );
    }

    fn create_service() -> Self::PlatformServiceImpl {
        // SAFETY: The PMC registers are always mapped as device memory while BL31 is running, and
        // are `TEGRA_PMC_SIZE` bytes long. Single 32-bit accesses to them have no effect on
        // memory safety.
        let pmc = unsafe {
            MmioWindow::new(
                NonNull::new(TEGRA_PMC_BASE as *mut u32).unwrap(),
                TEGRA_PMC_SIZE,
            )
        };
        // If this runs before `init` then EMC queries have nothing to report.
        TegraSip::new(pmc, PLAT_PARAMS.get())
    }
}
