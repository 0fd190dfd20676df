//! Command Runner
//!
//! Thin seam between the build steps and the external Android tools.

use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use droidbuild_core::BuildError;

/// One invocation of an external tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Working directory; `None` inherits the caller's
    pub cwd: Option<PathBuf>,
    /// Capture stdout/stderr instead of passing them through
    pub capture: bool,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            capture: false,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn capture_output(mut self) -> Self {
        self.capture = true;
        self
    }

    /// The full argument vector, program first
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.to_string_lossy().into_owned())
            .chain(self.args.iter().cloned())
            .collect()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv().join(" "))
    }
}

/// Output of a finished invocation. Empty unless the output was captured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs external tools
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `invocation` to completion. A non-zero exit is an error.
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, BuildError>;
}

/// Runs tools as child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, BuildError> {
        info!("Running: {}", invocation);

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        if let Some(ref cwd) = invocation.cwd {
            cmd.current_dir(cwd);
        }

        if invocation.capture {
            let output = cmd
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .output()
                .await?;

            let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

            if !output.status.success() {
                return Err(BuildError::Process(format!(
                    "{} failed ({}): {}",
                    invocation,
                    output.status,
                    stderr.trim()
                )));
            }

            debug!("{} produced {} bytes of output", invocation.program.display(), stdout.len());
            Ok(CommandOutput { stdout, stderr })
        } else {
            let status = cmd.status().await?;
            if !status.success() {
                return Err(BuildError::Process(format!("{} failed ({})", invocation, status)));
            }
            Ok(CommandOutput::default())
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_builder() {
        let inv = Invocation::new("/sdk/tools/android")
            .args(["list", "target"])
            .arg("--compact")
            .capture_output();

        assert_eq!(inv.argv(), vec!["/sdk/tools/android", "list", "target", "--compact"]);
        assert!(inv.capture);
        assert!(inv.cwd.is_none());
        assert_eq!(inv.to_string(), "/sdk/tools/android list target --compact");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_process_runner_captures_stdout() {
        let inv = Invocation::new("sh").args(["-c", "echo android-19"]).capture_output();
        let output = ProcessRunner.run(&inv).await.unwrap();
        assert_eq!(output.stdout.trim(), "android-19");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_process_runner_reports_failure() {
        let inv = Invocation::new("sh").args(["-c", "exit 3"]);
        let err = ProcessRunner.run(&inv).await.unwrap_err();
        assert!(matches!(err, BuildError::Process(_)));
    }
}
