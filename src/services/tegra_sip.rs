// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Tegra210 SiP calls: diagnostic PMC register access and EMC timing table info.

pub mod pmc;

use crate::{
    context::{OutputSlot, World},
    mmio::{InvalidOffset, RegisterWindow},
    plat_params::PlatParams,
    services::{Service, owns},
    smccc::{FunctionId, NOT_SUPPORTED, OwningEntityNumber, SUCCESS, SmcReturn},
};
use core::fmt::{self, Display, Formatter};
use log::{debug, error, warn};
use num_enum::TryFromPrimitive;
use pmc::PMC_BLOCKLIST;

/// Reads or writes a PMC register.
pub const TEGRA_SIP_PMC_COMMANDS: u32 = 0xC2FF_FE00;
/// Returns information about the EMC timing table.
pub const TEGRA_SIP_EMC_COMMANDS: u32 = 0xC2FF_FE01;

/// `x1` of a PMC command: which direction to access the register in.
#[derive(Copy, Clone, Debug, Eq, PartialEq, TryFromPrimitive)]
#[repr(u64)]
enum PmcOp {
    Read = 0xaa,
    Write = 0xbb,
}

/// `x1` of an EMC command: which field of the table descriptor to return.
#[derive(Copy, Clone, Debug, Eq, PartialEq, TryFromPrimitive)]
#[repr(u64)]
enum EmcQuery {
    TableAddr = 0xaa,
    TableSize = 0xbb,
}

/// Errors returned to the caller in `x0`, as negated errno values.
#[repr(i32)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SipError {
    /// The register is blocklisted (`-EFAULT`).
    AccessDenied = -14,
    /// The offset, selector or requested value is not valid (`-EINVAL`).
    InvalidArgument = -22,
    /// The function ID isn't one of the Tegra210 SiP calls (`-ENOTSUP`).
    UnsupportedFunction = -95,
}

impl Display for SipError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::AccessDenied => f.write_str("access denied"),
            Self::InvalidArgument => f.write_str("invalid argument"),
            Self::UnsupportedFunction => f.write_str("unsupported function"),
        }
    }
}

impl From<InvalidOffset> for SipError {
    fn from(_: InvalidOffset) -> Self {
        Self::InvalidArgument
    }
}

impl From<SipError> for SmcReturn {
    fn from(e: SipError) -> Self {
        SmcReturn::from(e as i32)
    }
}

/// One SiP call, as trapped from the caller.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CallRequest {
    /// The function ID from `x0`.
    pub function: FunctionId,
    /// `x1` to `x4`.
    pub args: [u64; 4],
    /// The security state of the caller.
    pub world: World,
}

impl CallRequest {
    /// Builds a request from the registers saved when the SMC trapped to EL3.
    pub fn from_regs(regs: &[u64; 18], world: World) -> Self {
        Self {
            function: FunctionId::from_x0(regs[0]),
            args: [regs[1], regs[2], regs[3], regs[4]],
            world,
        }
    }
}

/// The outcome of a SiP call.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CallResult {
    /// The caller isn't allowed to make SiP calls at all, so the call is treated as unknown.
    Unrecognized,
    /// The call succeeded, with an output value for `x1` if it produces one.
    Complete(Option<u64>),
    /// The call was rejected.
    Failed(SipError),
}

impl CallResult {
    /// Returns the status code the caller sees in `x0`.
    pub fn status(&self) -> i32 {
        match self {
            Self::Unrecognized => NOT_SUPPORTED,
            Self::Complete(_) => SUCCESS,
            Self::Failed(e) => *e as i32,
        }
    }
}

impl From<Result<Option<u64>, SipError>> for CallResult {
    fn from(result: Result<Option<u64>, SipError>) -> Self {
        match result {
            Ok(output) => Self::Complete(output),
            Err(e) => Self::Failed(e),
        }
    }
}

/// The Tegra210 SiP service.
///
/// Holds the PMC register window and the parameters BL2 passed at boot. Neither is ever modified
/// by a call, so one instance can serve all cores at once.
#[derive(Debug)]
pub struct TegraSip<'a, W: RegisterWindow> {
    pmc: W,
    params: &'a PlatParams,
}

impl<'a, W: RegisterWindow> TegraSip<'a, W> {
    /// Creates the service for the given PMC window and boot parameters.
    pub const fn new(pmc: W, params: &'a PlatParams) -> Self {
        Self { pmc, params }
    }

    /// Handles a SiP call.
    ///
    /// Only calls from the normal world are served; anything else gets
    /// [`CallResult::Unrecognized`] without looking at the arguments. A successful call which
    /// produces a value writes it to `output`, which is otherwise left alone.
    pub fn handle(&self, request: &CallRequest, output: &mut impl OutputSlot) -> CallResult {
        if request.world != World::NonSecure {
            return CallResult::Unrecognized;
        }

        // These function IDs use bits 16-23, so bit 16 is not an SVE hint here and the whole ID
        // must match.
        let function = request.function;
        let [x1, x2, x3, _] = request.args;

        let result = match function.0 {
            TEGRA_SIP_PMC_COMMANDS => self.handle_pmc(x1, x2, x3),
            TEGRA_SIP_EMC_COMMANDS => self.handle_emc(x1),
            _ => {
                debug!("Unsupported Tegra SiP call {function:?}");
                Err(SipError::UnsupportedFunction)
            }
        };

        if let Ok(Some(value)) = result {
            output.set_output(value);
        }
        result.into()
    }

    fn handle_pmc(&self, op: u64, offset: u64, value: u64) -> Result<Option<u64>, SipError> {
        let offset = self.pmc.checked_offset(offset).inspect_err(|e| {
            warn!("PMC access rejected: {e}");
        })?;

        if let Some(range) = PMC_BLOCKLIST.lookup(offset) {
            error!(
                "PMC access denied: offset={:#x} ({})",
                offset.get(),
                range.reason
            );
            return Err(SipError::AccessDenied);
        }

        match PmcOp::try_from(op) {
            Ok(PmcOp::Read) => Ok(Some(self.pmc.read32(offset).into())),
            Ok(PmcOp::Write) => {
                // Only the low 32 bits of `x3` are written.
                self.pmc.write32(offset, value as u32);
                Ok(None)
            }
            Err(_) => {
                warn!("Invalid PMC operation {op:#x}");
                Err(SipError::InvalidArgument)
            }
        }
    }

    fn handle_emc(&self, query: u64) -> Result<Option<u64>, SipError> {
        let value = match EmcQuery::try_from(query) {
            Ok(EmcQuery::TableAddr) => self.params.emc_table_base(),
            Ok(EmcQuery::TableSize) => self.params.emc_table_size(),
            Err(_) => None,
        };
        match value {
            Some(value) => Ok(Some(value)),
            None => {
                warn!("EMC table query {query:#x} has no answer");
                Err(SipError::InvalidArgument)
            }
        }
    }

    fn handle_smc(&self, regs: &[u64; 18], world: World) -> (SmcReturn, World) {
        let request = CallRequest::from_regs(regs, world);
        let mut ret = SmcReturn::EMPTY;
        let status = self.handle(&request, &mut ret).status();
        ret.set(0, i64::from(status) as u64);
        (ret, world)
    }
}

impl<W: RegisterWindow> Service for TegraSip<'_, W> {
    owns!(OwningEntityNumber::SIP);

    fn handle_non_secure_smc(&self, regs: &[u64; 18]) -> (SmcReturn, World) {
        self.handle_smc(regs, World::NonSecure)
    }

    fn handle_secure_smc(&self, regs: &[u64; 18]) -> (SmcReturn, World) {
        self.handle_smc(regs, World::Secure)
    }
}
