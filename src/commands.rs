//! CLI commands for droidbuild
//!
//! Each command runs one build step and renders its result for the terminal.

use std::path::PathBuf;
use anyhow::{Context, Result};
use tracing::info;

use droidbuild_descriptors::{ManifestDescriptor, ProjectDescriptor};
use droidbuild_toolchain::{select_best, BuildEnvironment, CommandRunner};

/// Show the SDK levels of an AndroidManifest.xml
pub struct ManifestCommand {
    pub path: PathBuf,
    pub json: bool,
}

impl ManifestCommand {
    pub fn execute(&self) -> Result<String> {
        let manifest = ManifestDescriptor::from_path(&self.path)?;

        if self.json {
            return Ok(serde_json::to_string_pretty(&manifest)?);
        }
        Ok(format!(
            "minSdkVersion: {}\ntargetSdkVersion: {}",
            manifest.min_sdk(),
            manifest.target_sdk()
        ))
    }
}

/// Show the project name of a build.xml
pub struct ProjectCommand {
    pub path: PathBuf,
    pub json: bool,
}

impl ProjectCommand {
    pub fn execute(&self) -> Result<String> {
        let project = ProjectDescriptor::from_path(&self.path)?;

        if self.json {
            return Ok(serde_json::to_string_pretty(&project)?);
        }
        Ok(project.project_name().unwrap_or_default().to_string())
    }
}

/// Pick the best installed SDK target for an API range
pub struct SelectSdkCommand {
    pub min_version: i32,
    pub max_version: i32,
    /// Saved `android list target --compact` output; queried live when absent
    pub listing: Option<PathBuf>,
}

impl SelectSdkCommand {
    pub async fn execute<R: CommandRunner>(&self, env: &BuildEnvironment<R>) -> Result<String> {
        if let Some(ref listing) = self.listing {
            let contents = tokio::fs::read_to_string(listing)
                .await
                .with_context(|| format!("reading target listing {:?}", listing))?;
            return Ok(select_best(&contents, self.min_version, self.max_version)?);
        }

        let android = env.android_tool()?;
        Ok(env
            .find_best_android_sdk(&android, self.min_version, self.max_version)
            .await?)
    }
}

/// Build native libraries with ndk-build
pub struct LibsCommand {
    pub subprojects: Vec<PathBuf>,
    pub output: Option<PathBuf>,
}

impl LibsCommand {
    pub async fn execute<R: CommandRunner>(&self, env: &BuildEnvironment<R>) -> Result<String> {
        let built = env
            .build_android_libraries(self.subprojects.as_slice(), self.output.as_deref())
            .await?;

        info!("Built {} native project(s)", built.len());
        Ok(built
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

/// Package an APK with ant
pub struct ApkCommand {
    pub subproject: Option<PathBuf>,
    pub json: bool,
}

impl ApkCommand {
    pub async fn execute<R: CommandRunner>(&self, env: &BuildEnvironment<R>) -> Result<String> {
        let output = env.build_android_apk(self.subproject.as_deref()).await?;

        info!("Build successful: {:?}", output.apk_path);
        if self.json {
            return Ok(serde_json::to_string_pretty(&output)?);
        }
        Ok(output.apk_path.display().to_string())
    }
}
