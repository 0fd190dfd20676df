//! SDK Target Selection
//!
//! Picks the installed SDK platform that best fits a manifest's API range,
//! from the output of `android list target --compact`.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, trace};

use droidbuild_core::{BuildError, ConfigurationError};

use crate::runner::{CommandRunner, Invocation};

/// `<platform>-<api level>`, e.g. `android-19`
static TARGET_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<platform>[A-Za-z][\w.-]*)-(?P<version>\d+)$").expect("valid target pattern")
});

/// An installed SDK target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledTarget {
    /// The full target name as listed, e.g. `android-19`
    pub name: String,
    pub platform: String,
    pub version: i32,
}

/// Extract the `<platform>-<version>` lines of a target listing.
/// Anything else (add-ons, headers, blank lines) is ignored.
pub fn parse_installed_targets(listing: &str) -> Vec<InstalledTarget> {
    listing
        .lines()
        .map(str::trim)
        .filter_map(|line| {
            let target = TARGET_LINE.captures(line).and_then(|caps| {
                Some(InstalledTarget {
                    name: line.to_string(),
                    platform: caps["platform"].to_string(),
                    version: caps["version"].parse().ok()?,
                })
            });
            if target.is_none() && !line.is_empty() {
                trace!("Ignoring target line {:?}", line);
            }
            target
        })
        .collect()
}

/// Select the highest installed target whose version lies in
/// `[min_version, max_version]`.
///
/// Line order does not matter; among equal versions the first listed wins.
pub fn select_best(listing: &str, min_version: i32, max_version: i32) -> Result<String, ConfigurationError> {
    let targets = parse_installed_targets(listing);

    let mut best: Option<&InstalledTarget> = None;
    for target in targets
        .iter()
        .filter(|t| (min_version..=max_version).contains(&t.version))
    {
        if best.map_or(true, |b| target.version > b.version) {
            best = Some(target);
        }
    }

    match best {
        Some(target) => {
            debug!(
                "Selected {} for API range [{}, {}]",
                target.name, min_version, max_version
            );
            Ok(target.name.clone())
        }
        None => {
            let installed: Vec<&str> = targets.iter().map(|t| t.name.as_str()).collect();
            Err(ConfigurationError::new(format!(
                "no compatible SDK installed for API levels [{}, {}] (installed: {})",
                min_version,
                max_version,
                if installed.is_empty() {
                    "none".to_string()
                } else {
                    installed.join(", ")
                }
            )))
        }
    }
}

/// Queries the SDK's `android` tool for installed targets
pub struct SdkSelector<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
    android_tool: PathBuf,
}

impl<'a, R: CommandRunner + ?Sized> SdkSelector<'a, R> {
    pub fn new(runner: &'a R, android_tool: impl AsRef<Path>) -> Self {
        Self {
            runner,
            android_tool: android_tool.as_ref().to_path_buf(),
        }
    }

    /// The invocation that lists installed targets
    pub fn list_invocation(&self) -> Invocation {
        Invocation::new(&self.android_tool)
            .args(["list", "target", "--compact"])
            .capture_output()
    }

    /// Raw target listing
    pub async fn installed_targets(&self) -> Result<String, BuildError> {
        let output = self.runner.run(&self.list_invocation()).await?;
        Ok(output.stdout)
    }

    /// Highest installed target in `[min_version, max_version]`
    pub async fn select_best(&self, min_version: i32, max_version: i32) -> Result<String, BuildError> {
        let listing = self.installed_targets().await?;
        let target = select_best(&listing, min_version, max_version)?;
        info!("Using SDK target {}", target);
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::testing::RecordingRunner;

    const LISTING: &str = "android-3\nandroid-5\nmeaningless\nandroid-10\n";

    #[test]
    fn test_parse_installed_targets() {
        let targets = parse_installed_targets(
            "Available Android targets:\n  android-19\nGoogle Inc.:Google APIs:19\nandroid-L\nandroid-sdk-21\n\n",
        );
        assert_eq!(
            targets,
            vec![
                InstalledTarget {
                    name: "android-19".into(),
                    platform: "android".into(),
                    version: 19
                },
                InstalledTarget {
                    name: "android-sdk-21".into(),
                    platform: "android-sdk".into(),
                    version: 21
                },
            ]
        );
    }

    #[test]
    fn test_select_within_range() {
        assert_eq!(select_best(LISTING, 1, 5).unwrap(), "android-5");
        assert_eq!(select_best(LISTING, 5, 15).unwrap(), "android-10");
        assert_eq!(select_best(LISTING, 3, 3).unwrap(), "android-3");
    }

    #[test]
    fn test_select_nothing_in_range() {
        assert!(select_best(LISTING, 1, 2).is_err());
        let err = select_best(LISTING, 11, 20).unwrap_err();
        assert!(err.message().contains("android-10"));
        assert!(select_best(LISTING, 10, 3).is_err());
        assert!(select_best("", 1, 30).is_err());
    }

    #[test]
    fn test_select_ignores_line_order() {
        assert_eq!(
            select_best("platform-10\nplatform-15\nplatform-7\n", 5, 15).unwrap(),
            "platform-15"
        );
    }

    #[test]
    fn test_select_first_of_equal_versions() {
        assert_eq!(select_best("android-9\nvendor-9\n", 1, 9).unwrap(), "android-9");
    }

    #[test]
    fn test_overflowing_version_is_ignored() {
        assert_eq!(
            select_best("android-99999999999\nandroid-4\n", 1, i32::MAX).unwrap(),
            "android-4"
        );
    }

    #[tokio::test]
    async fn test_selector_runs_android_tool() {
        let runner = RecordingRunner::new();
        runner.respond(LISTING);
        runner.respond("android-10\nandroid-15\nandroid-7\n");

        let selector = SdkSelector::new(&runner, "android");
        assert_eq!(selector.select_best(1, 5).await.unwrap(), "android-5");
        assert_eq!(selector.select_best(5, 15).await.unwrap(), "android-15");

        let invocations = runner.invocations();
        assert_eq!(invocations.len(), 2);
        assert_eq!(invocations[0].argv(), vec!["android", "list", "target", "--compact"]);
        assert!(invocations[0].capture);
        assert!(invocations[0].cwd.is_none());
    }

    #[tokio::test]
    async fn test_selector_no_compatible_sdk() {
        let runner = RecordingRunner::new();
        runner.respond(LISTING);

        let err = SdkSelector::new(&runner, "android")
            .select_best(11, 20)
            .await
            .unwrap_err();
        assert!(matches!(err, BuildError::Configuration(_)));
    }
}
