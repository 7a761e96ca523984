// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Bounds-checked access to a window of 32-bit device registers.

use core::{
    fmt::{self, Display, Formatter},
    ptr::NonNull,
};

/// The size in bytes of a device register.
pub const REGISTER_SIZE: usize = size_of::<u32>();

/// Why a raw offset can't be used to address a register window.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InvalidOffset {
    /// The offset is at or beyond the end of the window.
    OutOfRange {
        /// The rejected offset.
        offset: u64,
        /// The size of the window in bytes.
        window_size: usize,
    },
    /// The offset is not a multiple of the register size.
    Misaligned {
        /// The rejected offset.
        offset: u64,
    },
}

impl Display for InvalidOffset {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::OutOfRange {
                offset,
                window_size,
            } => write!(f, "offset {offset:#x} outside window of {window_size:#x} bytes"),
            Self::Misaligned { offset } => write!(f, "offset {offset:#x} is not word aligned"),
        }
    }
}

/// A byte offset which is known to address a whole register inside a window.
///
/// Outside this crate the only way to get one is [`RegisterWindow::checked_offset`], so holding a
/// `RegisterOffset` means the range and alignment checks have passed for that window.
///
/// ```compile_fail
/// use rf_a_tegra210_sip::mmio::RegisterOffset;
///
/// let offset = RegisterOffset::new(0x50, 0xc00);
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct RegisterOffset(usize);

impl RegisterOffset {
    /// Checks that `offset` addresses a whole 32-bit register of a window of `window_size` bytes.
    pub(crate) fn new(offset: u64, window_size: usize) -> Result<Self, InvalidOffset> {
        let in_range = usize::try_from(offset)
            .ok()
            .filter(|&offset| offset < window_size);
        let Some(offset_in_window) = in_range else {
            return Err(InvalidOffset::OutOfRange {
                offset,
                window_size,
            });
        };
        if !offset_in_window.is_multiple_of(REGISTER_SIZE) {
            return Err(InvalidOffset::Misaligned { offset });
        }
        Ok(Self(offset_in_window))
    }

    /// Returns the offset in bytes from the start of the window.
    pub const fn get(self) -> usize {
        self.0
    }
}

/// A window of 32-bit device registers.
///
/// Accesses are single 32-bit reads or writes; there is no locking, so concurrent accesses from
/// different cores are only as atomic as the device makes them.
pub trait RegisterWindow {
    /// Returns the size of the window in bytes.
    fn size(&self) -> usize;

    /// Reads the register at the given offset.
    fn read32(&self, offset: RegisterOffset) -> u32;

    /// Writes the register at the given offset.
    fn write32(&self, offset: RegisterOffset, value: u32);

    /// Validates a caller-supplied offset against the size of this window.
    fn checked_offset(&self, offset: u64) -> Result<RegisterOffset, InvalidOffset> {
        RegisterOffset::new(offset, self.size())
    }
}

impl<W: RegisterWindow + ?Sized> RegisterWindow for &W {
    fn size(&self) -> usize {
        (**self).size()
    }

    fn read32(&self, offset: RegisterOffset) -> u32 {
        (**self).read32(offset)
    }

    fn write32(&self, offset: RegisterOffset, value: u32) {
        (**self).write32(offset, value)
    }
}

/// A register window backed by real device memory.
#[derive(Debug)]
pub struct MmioWindow {
    base: NonNull<u32>,
    size: usize,
}

// SAFETY: `MmioWindow` only performs single volatile accesses to device memory, which any core may
// do at any time; it holds no other state.
unsafe impl Send for MmioWindow {}

// SAFETY: As above, sharing the window between cores only allows concurrent volatile accesses,
// which the device handles.
unsafe impl Sync for MmioWindow {}

impl MmioWindow {
    /// Creates a window of `size` bytes of device registers starting at `base`.
    ///
    /// # Safety
    ///
    /// `base` must be the word-aligned address of `size` bytes of device memory which is mapped for
    /// as long as the window exists, and in which any 32-bit aligned read or write is allowed to
    /// happen at any time.
    pub const unsafe fn new(base: NonNull<u32>, size: usize) -> Self {
        Self { base, size }
    }

    fn register(&self, offset: RegisterOffset) -> NonNull<u32> {
        assert!(offset.get() < self.size);
        // SAFETY: The offset is inside the window, as just checked, so the result is within the
        // device memory region `new` was given.
        unsafe { self.base.byte_add(offset.get()) }
    }
}

impl RegisterWindow for MmioWindow {
    fn size(&self) -> usize {
        self.size
    }

    fn read32(&self, offset: RegisterOffset) -> u32 {
        let register = self.register(offset);
        // SAFETY: `register` points to an aligned register in the window, which the caller of `new`
        // promised may be read at any time.
        unsafe { register.read_volatile() }
    }

    fn write32(&self, offset: RegisterOffset, value: u32) {
        let register = self.register(offset);
        // SAFETY: `register` points to an aligned register in the window, which the caller of `new`
        // promised may be written at any time.
        unsafe { register.write_volatile(value) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_in_range_and_aligned() {
        assert_eq!(RegisterOffset::new(0, 0xc00).unwrap().get(), 0);
        assert_eq!(RegisterOffset::new(0x50, 0xc00).unwrap().get(), 0x50);
        assert_eq!(RegisterOffset::new(0xbfc, 0xc00).unwrap().get(), 0xbfc);
    }

    #[test]
    fn offset_out_of_range() {
        assert_eq!(
            RegisterOffset::new(0xc00, 0xc00),
            Err(InvalidOffset::OutOfRange {
                offset: 0xc00,
                window_size: 0xc00
            })
        );
        assert!(matches!(
            RegisterOffset::new(u64::MAX, 0xc00),
            Err(InvalidOffset::OutOfRange { .. })
        ));
    }

    #[test]
    fn range_is_checked_before_alignment() {
        assert!(matches!(
            RegisterOffset::new(0xc01, 0xc00),
            Err(InvalidOffset::OutOfRange { .. })
        ));
    }

    #[test]
    fn offset_misaligned() {
        for offset in [1, 2, 3, 0x51, 0xbfe] {
            assert_eq!(
                RegisterOffset::new(offset, 0xc00),
                Err(InvalidOffset::Misaligned { offset })
            );
        }
    }

    #[test]
    fn mmio_window_accesses_memory() {
        let mut registers = [0u32; 4];
        // SAFETY: `registers` is word aligned, 16 bytes long and outlives `window`.
        let window = unsafe { MmioWindow::new(NonNull::from(&mut registers).cast(), 16) };

        let offset = window.checked_offset(8).unwrap();
        window.write32(offset, 0xdead_beef);
        assert_eq!(window.read32(offset), 0xdead_beef);
        assert_eq!(window.read32(window.checked_offset(4).unwrap()), 0);
        assert!(window.checked_offset(16).is_err());

        drop(window);
        assert_eq!(registers, [0, 0, 0xdead_beef, 0]);
    }

    #[test]
    #[should_panic]
    fn mmio_window_rejects_offset_from_larger_window() {
        let mut registers = [0u32; 1];
        // SAFETY: `registers` is word aligned, 4 bytes long and outlives `window`.
        let window = unsafe { MmioWindow::new(NonNull::from(&mut registers).cast(), 4) };
        let offset = RegisterOffset::new(4, 8).unwrap();

        window.read32(offset);
    }
}
