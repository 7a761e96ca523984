// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Tegra210 silicon-provider (SiP) SMC service for RF-A.
//!
//! Non-secure software can use two vendor SMCs on Tegra210:
//!
//! - `TEGRA_SIP_PMC_COMMANDS` reads or writes a 32-bit register of the power-management
//!   controller, except for a fixed set of registers which only EL3 or secure software may touch.
//! - `TEGRA_SIP_EMC_COMMANDS` returns the base address or size of the memory-controller timing
//!   table which the bootloader handed over to BL31.
//!
//! The service plugs into the BL31 runtime through [`services::Service`]; the platform layer in
//! [`platform`] creates it from the PMC register window and the boot parameters.

#![cfg_attr(not(test), no_std)]

pub mod blocklist;
pub mod context;
pub mod logger;
pub mod mmio;
pub mod plat_params;
pub mod platform;
pub mod services;
pub mod smccc;

pub use services::{
    Services,
    tegra_sip::{CallRequest, CallResult, SipError, TegraSip},
};
