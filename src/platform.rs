// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Platform selection and the hooks each platform implements.

macro_rules! select_platform {
    ($mod:ident::$plat_impl:ident) => {
        #[cfg(not(test))]
        mod $mod;

        #[cfg(not(test))]
        pub use $mod::$plat_impl as PlatformImpl;
    };
    (test, $mod:ident::$plat_impl:ident) => {
        #[cfg(test)]
        pub mod $mod;

        #[cfg(test)]
        pub use $mod::$plat_impl as PlatformImpl;
    };
}

select_platform!(tegra210::Tegra210);
select_platform!(test, test::TestPlatform);

use crate::{logger::LogSink, services::Service};

/// Type alias for convenience, to avoid having to use the complicated type name everywhere.
pub type LogSinkImpl = <PlatformImpl as Platform>::LogSinkImpl;

/// The service handling the platform's SiP calls.
pub type PlatformServiceImpl = <PlatformImpl as Platform>::PlatformServiceImpl;

/// The hooks implemented by all platforms.
pub trait Platform {
    /// Platform dependent LogSink implementation type for Logger.
    type LogSinkImpl: LogSink + Send + Sync + 'static;

    /// Service that handles platform-specific SMC calls.
    type PlatformServiceImpl: Service + Sync + Send;

    /// Initialises the logger and reads the parameters the previous boot stage passed in `arg0` to
    /// `arg3`.
    ///
    /// Any logs sent before this is called will be ignored.
    ///
    /// # Safety
    ///
    /// Any pointers the platform expects in the arguments must either be null or point to valid
    /// memory of the expected size, as set up by BL2.
    unsafe fn init(arg0: u64, arg1: u64, arg2: u64, arg3: u64);

    /// Creates instance of PlatformServiceImpl.
    ///
    /// This is used for dispatching platform-specific SMCs.
    fn create_service() -> Self::PlatformServiceImpl;
}
