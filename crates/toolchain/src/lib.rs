//! Android Toolchain Wrappers
//!
//! Drives the Android build tools for a project:
//! - SDK target selection from `android list target`
//! - Native libraries with `ndk-build`
//! - APK packaging with `android update project` and ant

pub mod apk;
pub mod env;
pub mod ndk;
pub mod runner;
pub mod sdk;

pub use apk::{validate_sdk_levels, ApkOutput};
pub use env::BuildEnvironment;
pub use runner::{CommandOutput, CommandRunner, Invocation, ProcessRunner};
pub use sdk::{parse_installed_targets, select_best, InstalledTarget, SdkSelector};
