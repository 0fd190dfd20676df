//! Native library builds with ndk-build.

use std::path::{Path, PathBuf};

use tracing::info;

use droidbuild_core::BuildError;

use crate::env::BuildEnvironment;
use crate::runner::{CommandRunner, Invocation};

impl<R: CommandRunner> BuildEnvironment<R> {
    /// The ndk-build invocation for one subproject:
    ///
    /// `ndk-build -B -j <cpus> -C <subproject> [V=1] [NDK_OUT=<output>] [make flags...]`
    pub fn library_invocation(
        &self,
        ndk_build: &Path,
        subproject: &Path,
        output: Option<&Path>,
    ) -> Result<Invocation, BuildError> {
        let settings = self.settings();
        let project = self.project_path(subproject)?;

        let mut invocation = Invocation::new(ndk_build).args([
            "-B".to_string(),
            "-j".to_string(),
            settings.cpu_count.to_string(),
            "-C".to_string(),
            project.to_string_lossy().into_owned(),
        ]);

        if settings.verbose {
            invocation = invocation.arg("V=1");
        }
        if let Some(output) = output {
            let out_dir = self.project_path(output)?;
            invocation = invocation.arg(format!("NDK_OUT={}", out_dir.display()));
        }

        Ok(invocation.args(settings.make_flag_list()))
    }

    /// Build the native libraries of each subproject (relative to the project
    /// directory) with ndk-build, optionally placing objects under `output`.
    pub async fn build_android_libraries<P: AsRef<Path>>(
        &self,
        subprojects: &[P],
        output: Option<&Path>,
    ) -> Result<Vec<PathBuf>, BuildError> {
        let ndk_build = self.ndk_build_path();
        if !ndk_build.exists() {
            return Err(BuildError::ToolPath(format!("ndk-build ({:?})", ndk_build)));
        }

        let mut built = Vec::with_capacity(subprojects.len());
        for subproject in subprojects {
            let invocation = self.library_invocation(&ndk_build, subproject.as_ref(), output)?;
            info!("Building native libraries in {:?}", subproject.as_ref());
            self.runner().run(&invocation).await?;
            built.push(self.project_path(subproject)?);
        }

        Ok(built)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use droidbuild_core::BuildSettings;

    use crate::runner::testing::RecordingRunner;

    fn environment(ndk: &Path, project: &Path) -> BuildEnvironment<RecordingRunner> {
        let env = BuildEnvironment::with_runner(
            BuildSettings {
                ndk_home: ndk.to_path_buf(),
                project_dir: project.to_path_buf(),
                cpu_count: 4,
                ..Default::default()
            },
            RecordingRunner::new(),
        );
        std::fs::write(env.ndk_build_path(), "").unwrap();
        env
    }

    #[tokio::test]
    async fn test_build_libraries() {
        let ndk = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        let mut env = environment(ndk.path(), project.path());

        let ndk_build = env.ndk_build_path().to_string_lossy().into_owned();
        let lpath = project.path().join("libfoo").to_string_lossy().into_owned();
        let mut expect = vec![
            ndk_build,
            "-B".to_string(),
            "-j".to_string(),
            "4".to_string(),
            "-C".to_string(),
            lpath.clone(),
        ];

        let built = env.build_android_libraries(&["libfoo"], None).await.unwrap();
        assert_eq!(built, vec![project.path().join("libfoo")]);
        assert_eq!(env.runner().invocations()[0].argv(), expect);
        assert!(env.runner().invocations()[0].cwd.is_none());

        env.runner().clear();
        env.settings_mut().verbose = true;
        expect.push("V=1".to_string());
        env.build_android_libraries(&["libfoo"], None).await.unwrap();
        assert_eq!(env.runner().invocations()[0].argv(), expect);

        env.runner().clear();
        expect.push(format!("NDK_OUT={}", lpath));
        env.build_android_libraries(&["libfoo"], Some(Path::new("libfoo")))
            .await
            .unwrap();
        assert_eq!(env.runner().invocations()[0].argv(), expect);

        env.runner().clear();
        env.settings_mut().make_flags = "-DFOO -DBAR -DBAZ".to_string();
        expect.extend(["-DFOO", "-DBAR", "-DBAZ"].map(String::from));
        env.build_android_libraries(&["libfoo"], Some(Path::new("libfoo")))
            .await
            .unwrap();
        assert_eq!(env.runner().invocations()[0].argv(), expect);
    }

    #[tokio::test]
    async fn test_build_multiple_subprojects() {
        let ndk = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        let env = environment(ndk.path(), project.path());

        env.build_android_libraries(&["liba", "libb"], None).await.unwrap();

        let invocations = env.runner().invocations();
        assert_eq!(invocations.len(), 2);
        assert_eq!(invocations[0].args[4], project.path().join("liba").to_string_lossy());
        assert_eq!(invocations[1].args[4], project.path().join("libb").to_string_lossy());
    }

    #[tokio::test]
    async fn test_missing_ndk_build() {
        let ndk = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        let mut env = environment(ndk.path(), project.path());
        env.settings_mut().ndk_home = PathBuf::from("/dev/null");

        let err = env.build_android_libraries(&["libfoo"], None).await.unwrap_err();
        assert!(matches!(err, BuildError::ToolPath(_)));
        assert!(env.runner().invocations().is_empty());
    }
}
