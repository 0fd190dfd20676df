//! droidbuild Core - shared types
//!
//! Error types and build settings used by the descriptor parsers and the
//! toolchain wrappers.

pub mod config;
pub mod error;

pub use config::BuildSettings;
pub use error::{BuildError, ConfigurationError, Result};

/// droidbuild version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
