//! Build Environment
//!
//! Binds build settings to a command runner and resolves the tools the build
//! steps need.

use std::path::{Path, PathBuf};

use tracing::debug;

use droidbuild_core::{BuildError, BuildSettings};

use crate::runner::{CommandRunner, ProcessRunner};
use crate::sdk::SdkSelector;

/// Settings plus the runner used to drive the Android tools
pub struct BuildEnvironment<R: CommandRunner = ProcessRunner> {
    settings: BuildSettings,
    runner: R,
}

impl BuildEnvironment<ProcessRunner> {
    /// Create an environment that runs tools as child processes
    pub fn new(settings: BuildSettings) -> Self {
        Self::with_runner(settings, ProcessRunner)
    }
}

impl<R: CommandRunner> BuildEnvironment<R> {
    /// Create an environment with a custom runner
    pub fn with_runner(settings: BuildSettings, runner: R) -> Self {
        Self { settings, runner }
    }

    pub fn settings(&self) -> &BuildSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut BuildSettings {
        &mut self.settings
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// `project_dir/relative` as an absolute path
    pub fn project_path(&self, relative: impl AsRef<Path>) -> Result<PathBuf, BuildError> {
        absolute(&self.settings.project_dir.join(relative))
    }

    /// Location of `ndk-build` inside the NDK
    pub fn ndk_build_path(&self) -> PathBuf {
        self.settings.ndk_home.join(ndk_build_name())
    }

    /// The SDK's `android` tool: `<sdk_home>/tools/android`, else `android` on PATH
    pub fn android_tool(&self) -> Result<PathBuf, BuildError> {
        let bundled = self.settings.sdk_home.join("tools").join(android_tool_name());
        if bundled.is_file() {
            return Ok(bundled);
        }

        which::which(android_tool_name()).map_err(|_| {
            BuildError::ToolPath(format!(
                "android tool (looked in {:?} and on PATH)",
                bundled
            ))
        })
    }

    /// The ant executable named by `ant_path`, either as given or on PATH
    pub fn ant_tool(&self) -> Result<PathBuf, BuildError> {
        let ant = &self.settings.ant_path;
        if ant.is_file() {
            return Ok(ant.clone());
        }

        which::which(ant).map_err(|_| BuildError::ToolPath(format!("ant ({:?})", ant)))
    }

    /// Highest installed SDK target in `[min_version, max_version]`, as
    /// reported by `android_tool`
    pub async fn find_best_android_sdk(
        &self,
        android_tool: &Path,
        min_version: i32,
        max_version: i32,
    ) -> Result<String, BuildError> {
        debug!(
            "Looking for an SDK target in [{}, {}] with {:?}",
            min_version, max_version, android_tool
        );
        SdkSelector::new(&self.runner, android_tool)
            .select_best(min_version, max_version)
            .await
    }
}

/// Make `path` absolute against the current directory without touching the
/// filesystem
pub(crate) fn absolute(path: &Path) -> Result<PathBuf, BuildError> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn ndk_build_name() -> &'static str {
    if cfg!(windows) { "ndk-build.cmd" } else { "ndk-build" }
}

fn android_tool_name() -> &'static str {
    if cfg!(windows) { "android.bat" } else { "android" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::testing::RecordingRunner;

    #[test]
    fn test_project_path_is_absolute() {
        let env = BuildEnvironment::with_runner(
            BuildSettings {
                project_dir: PathBuf::from("relative/project"),
                ..Default::default()
            },
            RecordingRunner::new(),
        );

        let path = env.project_path("jni").unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("relative/project/jni"));
    }

    #[test]
    fn test_bundled_android_tool() {
        let sdk = tempfile::tempdir().unwrap();
        let tools = sdk.path().join("tools");
        std::fs::create_dir_all(&tools).unwrap();
        std::fs::write(tools.join(android_tool_name()), "").unwrap();

        let env = BuildEnvironment::with_runner(
            BuildSettings {
                sdk_home: sdk.path().to_path_buf(),
                ..Default::default()
            },
            RecordingRunner::new(),
        );
        assert_eq!(env.android_tool().unwrap(), tools.join(android_tool_name()));
    }

    #[test]
    fn test_missing_ant_is_a_tool_path_error() {
        let env = BuildEnvironment::with_runner(
            BuildSettings {
                ant_path: PathBuf::from("/dev/null/ant"),
                ..Default::default()
            },
            RecordingRunner::new(),
        );
        assert!(matches!(env.ant_tool(), Err(BuildError::ToolPath(_))));
    }
}
