// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Build script for the Tegra210 SiP service.

fn main() {
    // The log level is baked in by `logger::build_time_log_level`.
    println!("cargo:rerun-if-env-changed=LOG_LEVEL");
    println!("cargo:rerun-if-changed=build.rs");
}
