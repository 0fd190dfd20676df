//! Android project descriptors
//!
//! Minimal readers for the two files an ant-based Android project carries:
//! `AndroidManifest.xml` (SDK levels) and `build.xml` (project name).
//! Parsing is syntactic only; every structural fault is a
//! [`ConfigurationError`](droidbuild_core::ConfigurationError).

mod xml;

pub mod manifest;
pub mod project;

pub use manifest::{ManifestDescriptor, MANIFEST_FILE};
pub use project::{ProjectDescriptor, BUILD_FILE};
