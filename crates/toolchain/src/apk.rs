//! APK packaging with ant.
//!
//! Reads the project's descriptors, checks the SDK range they declare, points
//! the project at the best installed SDK target and runs ant.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use droidbuild_core::{BuildError, ConfigurationError};
use droidbuild_descriptors::{ManifestDescriptor, ProjectDescriptor, BUILD_FILE, MANIFEST_FILE};

use crate::env::{absolute, BuildEnvironment};
use crate::runner::{CommandRunner, Invocation};

/// Result of an APK build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApkOutput {
    pub project_name: String,
    /// SDK target the project was built against, e.g. `android-19`
    pub sdk_target: String,
    /// Where ant places the package
    pub apk_path: PathBuf,
}

/// Reject SDK levels the manifest parser accepted verbatim
pub fn validate_sdk_levels(manifest: &ManifestDescriptor) -> Result<(), ConfigurationError> {
    if manifest.min_sdk() < 1 {
        return Err(ConfigurationError::new(format!(
            "minSdkVersion must be at least 1, found {}",
            manifest.min_sdk()
        )));
    }
    if manifest.target_sdk() < manifest.min_sdk() {
        return Err(ConfigurationError::new(format!(
            "targetSdkVersion {} is below minSdkVersion {}",
            manifest.target_sdk(),
            manifest.min_sdk()
        )));
    }
    Ok(())
}

/// Package file ant produces for `target`
pub fn apk_path(project_dir: &Path, project_name: &str, ant_target: &str) -> PathBuf {
    let file = if ant_target == "release" {
        format!("{}-release-unsigned.apk", project_name)
    } else {
        format!("{}-{}.apk", project_name, ant_target)
    };
    project_dir.join("bin").join(file)
}

impl<R: CommandRunner> BuildEnvironment<R> {
    /// Build the APK of `subproject` (or of the project directory itself).
    pub async fn build_android_apk(&self, subproject: Option<&Path>) -> Result<ApkOutput, BuildError> {
        let project_dir = match subproject {
            Some(subproject) => self.project_path(subproject)?,
            None => absolute(&self.settings().project_dir)?,
        };

        let manifest = ManifestDescriptor::from_path(project_dir.join(MANIFEST_FILE))?;
        let build_xml = ProjectDescriptor::from_path(project_dir.join(BUILD_FILE))?;
        validate_sdk_levels(&manifest)?;

        let project_name = build_xml
            .project_name()
            .ok_or_else(|| ConfigurationError::new(format!("{} has no project name", BUILD_FILE)))?
            .to_string();

        let android = self.android_tool()?;
        let ant = self.ant_tool()?;

        let sdk_target = self
            .find_best_android_sdk(&android, manifest.min_sdk(), manifest.target_sdk())
            .await?;

        let update = Invocation::new(&android).args([
            "update".to_string(),
            "project".to_string(),
            "--path".to_string(),
            project_dir.to_string_lossy().into_owned(),
            "--target".to_string(),
            sdk_target.clone(),
            "--name".to_string(),
            project_name.clone(),
        ]);
        self.runner().run(&update).await?;

        let settings = self.settings();
        let package = Invocation::new(ant)
            .args(settings.ant_flag_list())
            .arg(settings.ant_target.clone())
            .current_dir(&project_dir);
        info!("Packaging {} against {}", project_name, sdk_target);
        self.runner().run(&package).await?;

        if settings.sign_apk {
            info!("APK signing is handled outside droidbuild; leaving the package unsigned");
        }

        Ok(ApkOutput {
            apk_path: apk_path(&project_dir, &project_name, &settings.ant_target),
            project_name,
            sdk_target,
        })
    }
}
