//! Error types for droidbuild
//!
//! Centralized error handling using thiserror.

use std::fmt::Display;

use thiserror::Error;

/// A configuration or format fault in a descriptor, a settings file, or the
/// set of installed SDK targets.
///
/// This is the only error kind produced by descriptor parsing and SDK target
/// selection. Callers treat it as fatal to the current build step.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error: {message}")]
pub struct ConfigurationError {
    message: String,
}

impl ConfigurationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The human-readable message, without the "Configuration error" prefix
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Prefix the message with the file (or other source) it came from
    pub fn in_source(self, source: impl Display) -> Self {
        Self {
            message: format!("{}: {}", source, self.message),
        }
    }
}

/// Error type for build steps that drive external tools
#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Tool not found: {0}")]
    ToolPath(String),

    #[error("Process error: {0}")]
    Process(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for droidbuild operations
pub type Result<T> = std::result::Result<T, BuildError>;

impl BuildError {
    /// Check if this error comes from project or toolchain configuration
    /// rather than from the system
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            BuildError::Configuration(_) | BuildError::ToolPath(_) | BuildError::TomlParse(_)
        )
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            BuildError::Configuration(e) => format!("Configuration error: {}", e.message()),
            BuildError::ToolPath(tool) => {
                format!("Could not find {}. Check the SDK/NDK paths in your settings.", tool)
            }
            BuildError::Process(msg) => format!("Build step failed: {}", msg),
            BuildError::Io(e) => format!("File operation failed: {}", e),
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_message() {
        let err = ConfigurationError::new("missing <uses-sdk> element");
        assert_eq!(err.message(), "missing <uses-sdk> element");
        assert_eq!(err.to_string(), "Configuration error: missing <uses-sdk> element");

        let err = err.in_source("app/AndroidManifest.xml");
        assert_eq!(err.message(), "app/AndroidManifest.xml: missing <uses-sdk> element");
    }

    #[test]
    fn test_build_error_classification() {
        let err: BuildError = ConfigurationError::new("bad").into();
        assert!(err.is_configuration());
        assert_eq!(err.to_string(), "Configuration error: bad");

        assert!(BuildError::ToolPath("ndk-build".into()).is_configuration());
        assert!(!BuildError::Process("ant exited with 1".into()).is_configuration());
        assert_eq!(
            BuildError::Process("ant exited with 1".into()).user_message(),
            "Build step failed: ant exited with 1"
        );
    }
}
