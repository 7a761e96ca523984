// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Runtime services which handle SMCs trapped to EL3.

pub mod tegra_sip;

use crate::{
    context::World,
    platform::{self, Platform, PlatformImpl},
    smccc::{FunctionId, NOT_SUPPORTED, SmcReturn},
};
use log::trace;
use spin::Lazy;

/// Helper macro to define the SMC function ID values covered by a service
#[macro_export]
macro_rules! owns {
    // service handles the entire Owning Entity Number (OEN)
    ($owning_entity:expr) => {
        #[inline(always)]
        fn owns(&self, function: $crate::smccc::FunctionId) -> bool {
            function.oen() == $owning_entity
                && matches!(
                    function.call_type(),
                    $crate::smccc::SmcccCallType::Fast32 | $crate::smccc::SmcccCallType::Fast64
                )
        }
    };
}
pub(crate) use owns;

/// A service which handles some range of SMC calls.
///
/// According to SMCCC v1.3+ the implementation must disregard the SVE hint bit in the function ID
/// and consider it to be 0 for the purpose of function identification. Vendor calls allocated
/// before SMCCC v1.1 may use that bit as part of the function ID instead, in which case their
/// service matches the whole ID.
pub trait Service {
    /// Returns whether this service is intended to handle the given function ID.
    fn owns(&self, function: FunctionId) -> bool;

    /// Handles the given SMC call from Normal World.
    fn handle_non_secure_smc(&self, _regs: &[u64; 18]) -> (SmcReturn, World) {
        (NOT_SUPPORTED.into(), World::NonSecure)
    }

    /// Handles the given SMC call from Secure World.
    fn handle_secure_smc(&self, _regs: &[u64; 18]) -> (SmcReturn, World) {
        (NOT_SUPPORTED.into(), World::Secure)
    }
}

static SERVICES: Lazy<Services> = Lazy::new(Services::new);

/// Contains an instance of all of the currently implemented services.
pub struct Services {
    /// The platform's vendor SMC handler, i.e. the Tegra SiP calls.
    pub platform: platform::PlatformServiceImpl,
}

impl Services {
    /// Returns a reference to the global Services instance.
    ///
    /// Also, initializes it if it hasn't been initialized yet.
    pub fn get() -> &'static Self {
        &SERVICES
    }

    fn new() -> Self {
        Self {
            platform: PlatformImpl::create_service(),
        }
    }

    /// Handles an SMC trapped from the given world, returning the values for the caller's
    /// registers and the world to return to.
    pub fn handle_smc(&self, regs: &[u64; 18], world: World) -> (SmcReturn, World) {
        let function = FunctionId::from_x0(regs[0]);

        // Some SiP function IDs predate SMCCC v1.1 and use bits 16-23, so the platform service is
        // asked before the reserved bits are checked.
        let service: &dyn Service = if self.platform.owns(function) {
            &self.platform
        } else if !function.valid() {
            trace!("Invalid function ID {function:?} from {world:?}");
            return (NOT_SUPPORTED.into(), world);
        } else {
            trace!("Unowned function ID {function:?} from {world:?}");
            return (NOT_SUPPORTED.into(), world);
        };

        match world {
            World::NonSecure => service.handle_non_secure_smc(regs),
            World::Secure => service.handle_secure_smc(regs),
        }
    }
}
