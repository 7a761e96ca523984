// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Platform parameters handed over by BL2.

use core::{
    fmt::{self, Display, Formatter},
    ptr::NonNull,
    slice,
};
use log::warn;
use spin::Once;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Parameters which BL2 computes once during boot and passes to BL31.
///
/// This is the hand-off record defined by this crate, not NVIDIA's `plat_params_from_bl2_t`: the
/// block whose address arrives in `arg1` must start with these two fields, in this order. A field
/// which is zero was not provided by the bootloader.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, FromBytes, Immutable, IntoBytes, KnownLayout)]
#[repr(C)]
pub struct PlatParams {
    /// Physical address of the memory-controller timing table.
    pub emc_table_base: u64,
    /// Size in bytes of the memory-controller timing table.
    pub emc_table_size: u64,
}

/// An error parsing the BL2 parameter block.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PlatParamsError {
    /// The block is shorter than [`PlatParams`].
    Truncated {
        /// The length of the block which was provided.
        len: usize,
    },
}

impl Display for PlatParamsError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Truncated { len } => write!(
                f,
                "BL2 parameter block is {len} bytes, expected at least {}",
                size_of::<PlatParams>()
            ),
        }
    }
}

impl PlatParams {
    /// Parameters with nothing provided by the bootloader.
    pub const NONE: Self = Self {
        emc_table_base: 0,
        emc_table_size: 0,
    };

    /// Reads the parameters from the start of the block BL2 passed.
    ///
    /// Any bytes after the parameters this version knows about are ignored.
    pub fn from_bl2(block: &[u8]) -> Result<Self, PlatParamsError> {
        Self::read_from_prefix(block)
            .map(|(params, _rest)| params)
            .map_err(|_| PlatParamsError::Truncated { len: block.len() })
    }

    /// Copies the parameters out of the block BL2 left at `address`.
    ///
    /// A null `address` means BL2 passed nothing, in which case nothing is provided.
    ///
    /// # Safety
    ///
    /// `address` must be 0 or point to at least `size_of::<PlatParams>()` readable bytes.
    pub unsafe fn from_bl2_address(address: u64) -> Self {
        let Some(block) = NonNull::new(address as usize as *mut u8) else {
            warn!("No parameters from BL2");
            return Self::NONE;
        };
        // SAFETY: Our caller promised that a non-null `address` points to enough readable bytes,
        // and nothing writes to them while BL31 runs.
        let block = unsafe { slice::from_raw_parts(block.as_ptr(), size_of::<Self>()) };
        Self::from_bl2(block).unwrap_or_else(|e| {
            warn!("{e}");
            Self::NONE
        })
    }

    /// Returns the memory-controller table base address, if BL2 provided one.
    pub fn emc_table_base(&self) -> Option<u64> {
        Some(self.emc_table_base).filter(|&base| base != 0)
    }

    /// Returns the memory-controller table size, if BL2 provided one.
    pub fn emc_table_size(&self) -> Option<u64> {
        Some(self.emc_table_size).filter(|&size| size != 0)
    }
}

/// Holds the parameters BL2 passed, once BL31 has read them.
pub struct PlatParamsCell {
    params: Once<PlatParams>,
}

impl PlatParamsCell {
    /// Creates a cell with no parameters recorded yet.
    pub const fn new() -> Self {
        Self { params: Once::new() }
    }

    /// Records the parameters BL2 passed, and returns the ones in use.
    ///
    /// Only the first call records anything; later parameters are logged and dropped.
    pub fn set(&self, params: PlatParams) -> &PlatParams {
        let mut recorded = false;
        let in_use = self.params.call_once(|| {
            recorded = true;
            params
        });
        if !recorded {
            warn!("Ignoring BL2 parameters {params:?}, already using {in_use:?}");
        }
        in_use
    }

    /// Returns the recorded parameters, or [`PlatParams::NONE`] if none have been recorded yet.
    ///
    /// Asking too early doesn't stop a later [`set`](Self::set) from recording them.
    pub fn get(&self) -> &PlatParams {
        self.params.get().unwrap_or_else(|| {
            warn!("BL2 parameters read before they were recorded");
            &PlatParams::NONE
        })
    }
}

impl Default for PlatParamsCell {
    fn default() -> Self {
        Self::new()
    }
}
