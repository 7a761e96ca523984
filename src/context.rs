// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! The caller's side of an SMC: which world it came from and where results go.

use crate::smccc::SmcReturn;

/// The security state an SMC was issued from.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum World {
    /// Secure world, i.e. S-EL1 or S-EL2.
    Secure = 0,
    /// Normal world, i.e. NS-EL1 or NS-EL2.
    NonSecure = 1,
}

/// The one caller register a SiP call may hand a value back in.
///
/// Handlers only get this capability rather than the whole register file, so they can't clobber
/// anything but the output register.
pub trait OutputSlot {
    /// Sets the value the caller will see in its output register.
    fn set_output(&mut self, value: u64);
}

/// AArch64 general purpose register context of the caller, as saved on entry to EL3.
#[derive(Clone, Debug, Eq, PartialEq)]
#[repr(C, align(16))]
pub struct GpRegs {
    /// `x0`-`x30` followed by `sp_el0`.
    pub registers: [u64; Self::COUNT],
}

impl GpRegs {
    /// The number of (64-bit) registers included in `GpRegs`.
    const COUNT: usize = 32;

    /// The index of `x1`, which carries a SiP call's output value.
    pub const OUTPUT_REGISTER: usize = 1;

    /// A register file with every register set to zero.
    pub const EMPTY: Self = Self {
        registers: [0; Self::COUNT],
    };

    /// Writes the given return value to the general-purpose registers.
    pub fn write_return_value(&mut self, value: &SmcReturn) {
        for (i, value) in value.values().iter().enumerate() {
            self.registers[i] = *value;
        }
    }
}

impl OutputSlot for GpRegs {
    fn set_output(&mut self, value: u64) {
        self.registers[Self::OUTPUT_REGISTER] = value;
    }
}

impl OutputSlot for SmcReturn {
    fn set_output(&mut self, value: u64) {
        self.set(GpRegs::OUTPUT_REGISTER, value);
    }
}
