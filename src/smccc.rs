// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Types and helpers related to the SMC Calling Convention.

use core::fmt::{self, Debug, Display, Formatter};

const FAST_CALL: u32 = 0x8000_0000;
const SMC64: u32 = 0x4000_0000;
const OEN_MASK: u32 = 0x3f00_0000;
const OEN_SHIFT: u8 = 24;
const SVE_HINT: u32 = 1 << 16;
const RESERVED_BITS: u32 = 0x7f << 17;

/// The call completed successfully.
pub const SUCCESS: i32 = 0;

/// The call is not supported by the implementation.
///
/// This is also the `SMC_UNK` value which tells the caller that nobody recognised its SMC.
pub const NOT_SUPPORTED: i32 = -1;

/// The type of an SMCCC call: whether it is a fast call or yielding call, and which calling
/// convention it uses.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SmcccCallType {
    /// An SMC32/HVC32 fast call.
    Fast32,
    /// An SMC64/HVC64 fast call.
    Fast64,
    /// A yielding call.
    Yielding,
}

/// The owner of a range of function IDs, as named by the SMCCC.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OwningEntity {
    /// Arm architecture calls.
    ArmArchitectureService,
    /// CPU service calls.
    CPUService,
    /// Silicon-provider calls.
    SiPService,
    /// OEM service calls.
    OEMService,
    /// Standard secure service calls, e.g. PSCI.
    StandardSecureService,
    /// Standard hypervisor service calls.
    StandardHypervisorService,
    /// Vendor-specific hypervisor service calls.
    VendorSpecificHypervisorService,
    /// Vendor-specific EL3 monitor calls.
    VendorSpecificEL3MonitorService,
    /// Trusted application calls.
    TrustedApplications,
    /// Trusted OS calls.
    TrustedOS,
    /// Reserved.
    Unknown,
}

/// Owning Entity Number (OEN)
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct OwningEntityNumber(pub u8);

impl OwningEntityNumber {
    /// Silicon-provider calls, which is where the Tegra vendor SMCs live.
    pub const SIP: Self = Self(2);

    /// Returns which kind of entity owns this number.
    pub fn oe(self) -> OwningEntity {
        match self.0 {
            0 => OwningEntity::ArmArchitectureService,
            1 => OwningEntity::CPUService,
            2 => OwningEntity::SiPService,
            3 => OwningEntity::OEMService,
            4 => OwningEntity::StandardSecureService,
            5 => OwningEntity::StandardHypervisorService,
            6 => OwningEntity::VendorSpecificHypervisorService,
            7 => OwningEntity::VendorSpecificEL3MonitorService,
            48..=49 => OwningEntity::TrustedApplications,
            50..=63 => OwningEntity::TrustedOS,
            _ => OwningEntity::Unknown,
        }
    }
}

impl Display for OwningEntityNumber {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An SMCCC function ID.
#[derive(Copy, Clone, Eq, PartialEq)]
#[repr(transparent)]
pub struct FunctionId(pub u32);

impl FunctionId {
    /// Creates a new `FunctionId` from its components.
    pub const fn new(call_type: SmcccCallType, oen: OwningEntityNumber, number: u16) -> Self {
        let type_bits = match call_type {
            SmcccCallType::Fast32 => FAST_CALL,
            SmcccCallType::Fast64 => FAST_CALL | SMC64,
            SmcccCallType::Yielding => 0,
        };
        Self(type_bits | (((oen.0 as u32) << OEN_SHIFT) & OEN_MASK) | (number as u32))
    }

    /// Extracts the function ID from the value the caller put in `x0`.
    ///
    /// Only the low 32 bits of `x0` carry the function ID.
    pub fn from_x0(x0: u64) -> Self {
        Self(x0 as u32)
    }

    /// Returns the Owning Entity Number of the function ID.
    pub fn oen(self) -> OwningEntityNumber {
        OwningEntityNumber(((self.0 & OEN_MASK) >> OEN_SHIFT) as u8)
    }

    /// Returns the lower 16 bits of the function ID.
    pub fn number(self) -> u16 {
        self.0 as u16
    }

    /// Returns what type of call this is.
    pub fn call_type(self) -> SmcccCallType {
        if self.0 & FAST_CALL != 0 {
            if self.0 & SMC64 != 0 {
                SmcccCallType::Fast64
            } else {
                SmcccCallType::Fast32
            }
        } else {
            SmcccCallType::Yielding
        }
    }

    /// Returns whether the SVE hint bit is set.
    ///
    /// If this is true, the caller asserts that P0-P15, FFR and the bits with index greater than
    /// 127 in the Z0-Z31 registers do not contain any live state.
    pub fn sve_hint(self) -> bool {
        self.0 & SVE_HINT != 0
    }

    /// Sets the SVE hint bit.
    pub fn set_sve_hint(&mut self) {
        self.0 |= SVE_HINT
    }

    /// Clears the SVE hint bit.
    pub fn clear_sve_hint(&mut self) {
        self.0 &= !SVE_HINT
    }

    /// Returns false if this is a fast call but has any of bits 17-23 set.
    ///
    /// They are reserved for future use and should always be 0.
    pub fn valid(self) -> bool {
        self.call_type() == SmcccCallType::Yielding || self.0 & RESERVED_BITS == 0
    }
}

impl Display for FunctionId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

impl Debug for FunctionId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "{:#010x} ({:?} OEN {} {:?})",
            self.0,
            self.call_type(),
            self.oen(),
            self.oen().oe()
        )
    }
}

/// A value which can be returned from an SMC call by writing to the caller's registers.
#[derive(Clone, Default, Eq, PartialEq)]
pub struct SmcReturn {
    /// The number of elements from `values` that are actually used for this return.
    used: usize,
    values: [u64; Self::MAX_VALUES],
}

impl SmcReturn {
    /// The maximum number of registers an SMC call can return values in.
    pub const MAX_VALUES: usize = 18;

    /// A return which doesn't modify any of the caller's registers.
    pub const EMPTY: Self = Self {
        used: 0,
        values: [0; 18],
    };

    /// Returns a slice containing the used values.
    pub fn values(&self) -> &[u64] {
        &self.values[0..self.used]
    }

    /// Returns true if no values are used.
    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// Sets the value returned in register `index`, marking all registers up to it as used.
    ///
    /// Registers below `index` which weren't used before are returned as 0.
    pub fn set(&mut self, index: usize, value: u64) {
        self.values[index] = value;
        self.used = self.used.max(index + 1);
    }
}

impl Debug for SmcReturn {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "SmcReturn([")?;
        let values = self.values();
        if let Some(first) = values.first() {
            write!(f, "{first:#x}")?;
            for value in &values[1..] {
                write!(f, ", {value:#x}")?;
            }
        }
        write!(f, "])")?;
        Ok(())
    }
}

impl From<()> for SmcReturn {
    fn from(_: ()) -> Self {
        Self::EMPTY
    }
}

impl From<u64> for SmcReturn {
    fn from(value: u64) -> Self {
        let mut ret = Self::EMPTY;
        ret.set(0, value);
        ret
    }
}

impl From<i64> for SmcReturn {
    fn from(value: i64) -> Self {
        Self::from(value as u64)
    }
}

impl From<u32> for SmcReturn {
    fn from(value: u32) -> Self {
        Self::from(u64::from(value))
    }
}

impl From<i32> for SmcReturn {
    fn from(value: i32) -> Self {
        Self::from(i64::from(value))
    }
}

impl<const N: usize> From<[u64; N]> for SmcReturn {
    fn from(value: [u64; N]) -> Self {
        const { assert!(N <= SmcReturn::MAX_VALUES) };
        let mut values = [0; Self::MAX_VALUES];
        values[..N].copy_from_slice(&value);
        Self { used: N, values }
    }
}
