//! droidbuild - Android build helper
//!
//! Wraps the Android NDK/SDK tools and ant to compile native libraries and
//! package APKs, and reads the two descriptors those builds depend on.
//!
//! ## Architecture
//!
//! - `droidbuild-core`: error types and build settings
//! - `droidbuild-descriptors`: AndroidManifest.xml and build.xml parsing
//! - `droidbuild-toolchain`: SDK target selection, ndk-build and ant steps

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod commands;

// Re-export main components for library usage
pub use droidbuild_core as core;
pub use droidbuild_descriptors as descriptors;
pub use droidbuild_toolchain as toolchain;

/// Prelude module for convenient imports
pub mod prelude {
    pub use droidbuild_core::{BuildError, BuildSettings, ConfigurationError};
    pub use droidbuild_descriptors::{ManifestDescriptor, ProjectDescriptor};
    pub use droidbuild_toolchain::{select_best, BuildEnvironment, CommandRunner, ProcessRunner};
}
