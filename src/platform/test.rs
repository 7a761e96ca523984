// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! A fake platform for unit tests, with a simulated PMC.

use super::Platform;
use crate::{
    context::OutputSlot,
    logger::{self, LogSink},
    mmio::{REGISTER_SIZE, RegisterOffset, RegisterWindow},
    plat_params::PlatParams,
    services::tegra_sip::{TegraSip, pmc::TEGRA_PMC_SIZE},
};
use core::{
    fmt,
    sync::atomic::{AtomicUsize, Ordering},
};
use spin::mutex::SpinMutex;
use std::io::{Write, stdout};

const PMC_REGISTER_COUNT: usize = TEGRA_PMC_SIZE / REGISTER_SIZE;

/// An allowed PMC register which holds `0x1234` in the test platform's PMC.
pub const TEST_PMC_VALUE_OFFSET: usize = 0x50;

static TEST_PMC: FakePmc = FakePmc::from_registers({
    let mut registers = [0; PMC_REGISTER_COUNT];
    registers[TEST_PMC_VALUE_OFFSET / REGISTER_SIZE] = 0x1234;
    registers
});

static TEST_PLAT_PARAMS: PlatParams = PlatParams {
    emc_table_base: 0x8000_0000,
    emc_table_size: 0x1_0000,
};

/// A fake platform for unit tests.
pub struct TestPlatform;

impl Platform for TestPlatform {
    type LogSinkImpl = StdOutSink;
    type PlatformServiceImpl = TegraSip<'static, &'static FakePmc>;

    unsafe fn init(_arg0: u64, _arg1: u64, _arg2: u64, _arg3: u64) {
        logger::init(StdOutSink).expect("Failed to initialise logger");
    }

    fn create_service() -> Self::PlatformServiceImpl {
        TegraSip::new(&TEST_PMC, &TEST_PLAT_PARAMS)
    }
}

/// A simulated PMC register file, which counts the accesses made to it.
pub struct FakePmc {
    registers: SpinMutex<[u32; PMC_REGISTER_COUNT]>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl FakePmc {
    /// Creates a PMC with all registers zero.
    pub const fn new() -> Self {
        Self::from_registers([0; PMC_REGISTER_COUNT])
    }

    /// Creates a PMC with the given register values.
    pub const fn from_registers(registers: [u32; PMC_REGISTER_COUNT]) -> Self {
        Self {
            registers: SpinMutex::new(registers),
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    /// Sets a register directly, without counting it as an access.
    pub fn set(&self, offset: usize, value: u32) {
        self.registers.lock()[offset / REGISTER_SIZE] = value;
    }

    /// Returns a register directly, without counting it as an access.
    pub fn get(&self, offset: usize) -> u32 {
        self.registers.lock()[offset / REGISTER_SIZE]
    }

    /// Returns the number of reads made through [`RegisterWindow`].
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Returns the number of writes made through [`RegisterWindow`].
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl RegisterWindow for FakePmc {
    fn size(&self) -> usize {
        TEGRA_PMC_SIZE
    }

    fn read32(&self, offset: RegisterOffset) -> u32 {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.get(offset.get())
    }

    fn write32(&self, offset: RegisterOffset, value: u32) {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.set(offset.get(), value);
    }
}

/// An output slot which records every value written to it.
#[derive(Debug, Default)]
pub struct RecordingSlot {
    /// The values written, oldest first.
    pub writes: Vec<u64>,
}

impl OutputSlot for RecordingSlot {
    fn set_output(&mut self, value: u64) {
        self.writes.push(value);
    }
}

/// A log sink for tests which writes logs to standard output.
pub struct StdOutSink;

impl LogSink for StdOutSink {
    fn write_fmt(&self, args: fmt::Arguments) {
        stdout().write_fmt(args).unwrap();
    }

    fn flush(&self) {
        stdout().flush().unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_logging() {
        let writer = StdOutSink;
        writeln!(writer, "hello");
    }

    #[test]
    fn fake_pmc_counts_accesses() {
        let pmc = FakePmc::new();
        let offset = pmc.checked_offset(0x50).unwrap();

        pmc.write32(offset, 0x42);
        assert_eq!(pmc.read32(offset), 0x42);
        assert_eq!(pmc.get(0x50), 0x42);
        assert_eq!(pmc.reads(), 1);
        assert_eq!(pmc.writes(), 1);
    }

    #[test]
    fn test_pmc_preset_value() {
        assert_eq!(TEST_PMC.get(TEST_PMC_VALUE_OFFSET), 0x1234);
    }
}
