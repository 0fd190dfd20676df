//! Build Settings
//!
//! Paths to the Android tools and the flags passed to them:
//! - NDK and SDK locations
//! - ant executable, flags and target
//! - APK signing material (carried, not acted on)
//! - ndk-build parallelism and make flags

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use directories::ProjectDirs;
use tracing::{info, debug};

use crate::error::Result;

/// Settings for a build environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    /// Root of the project being built; subprojects are relative to it
    pub project_dir: PathBuf,
    /// Android NDK root (contains `ndk-build`)
    pub ndk_home: PathBuf,
    /// Android SDK root (contains `tools/android`)
    pub sdk_home: PathBuf,
    /// ant executable, either a path or a name looked up on PATH
    pub ant_path: PathBuf,
    /// Extra flags passed to ant, whitespace separated
    pub ant_flags: String,
    /// ant target (`release` or `debug`)
    pub ant_target: String,
    /// Keystore used to sign release APKs
    pub apk_keystore: Option<PathBuf>,
    /// File holding the keystore password
    pub apk_passfile: Option<PathBuf>,
    /// Key alias inside the keystore
    pub apk_keyalias: Option<String>,
    /// Whether release APKs should be signed
    pub sign_apk: bool,
    /// Extra flags passed to ndk-build, whitespace separated
    pub make_flags: String,
    /// Parallel jobs for ndk-build
    pub cpu_count: usize,
    /// Ask the tools for verbose output
    pub verbose: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            project_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            ndk_home: PathBuf::new(),
            sdk_home: PathBuf::new(),
            ant_path: PathBuf::from("ant"),
            ant_flags: String::new(),
            ant_target: "release".to_string(),
            apk_keystore: None,
            apk_passfile: None,
            apk_keyalias: None,
            sign_apk: false,
            make_flags: String::new(),
            cpu_count: num_cpus::get(),
            verbose: false,
        }
    }
}

impl BuildSettings {
    /// Get the configuration directory path
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "droidbuild", "droidbuild")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the default settings file path
    pub fn config_file() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Parse settings from TOML; missing keys take their defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load settings from a file
    pub async fn load(path: &Path) -> Result<Self> {
        debug!("Loading settings from {:?}", path);
        let contents = tokio::fs::read_to_string(path).await?;
        Self::from_toml_str(&contents)
    }

    /// Load settings from `path`, or from the default settings file, falling
    /// back to defaults when neither exists. An explicitly named file must exist.
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path).await;
        }

        match Self::config_file() {
            Some(file) if file.exists() => Self::load(&file).await,
            _ => {
                info!("No settings file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Save settings to a file
    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let contents = toml::to_string_pretty(self)?;
        tokio::fs::write(path, contents).await?;

        debug!("Settings saved to {:?}", path);
        Ok(())
    }

    /// ant flags split into arguments
    pub fn ant_flag_list(&self) -> Vec<String> {
        self.ant_flags.split_whitespace().map(str::to_string).collect()
    }

    /// ndk-build make flags split into arguments
    pub fn make_flag_list(&self) -> Vec<String> {
        self.make_flags.split_whitespace().map(str::to_string).collect()
    }
}
