//! Subprocess execution utilities.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::bail;
use thiserror::Error;

/// Builder for subprocess invocations.
///
/// Carries the command line plus working directory; execution happens
/// through a [`ProcessRunner`] so callers can be tested against a scripted
/// runner instead of a real shell.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Get the working directory, if one was set.
    pub fn get_cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// Display the command for log and error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }

    /// Spawn the command, wait for it, and capture its output.
    pub fn exec(&self) -> Result<ProcessOutput, CommandError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let output = cmd.output().map_err(|source| CommandError::Spawn {
            command: self.display_command(),
            source,
        })?;

        Ok(ProcessOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Captured result of a finished subprocess.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Exit code, if the process exited normally.
    pub code: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl ProcessOutput {
    /// Check whether the process exited with code zero.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// A subprocess that could not be spawned or exited non-zero.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to spawn `{command}`")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed with exit code {code:?}\n{stderr}")]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

impl CommandError {
    fn failed(cmd: &ProcessBuilder, output: &ProcessOutput) -> Self {
        CommandError::Failed {
            command: cmd.display_command(),
            code: output.code,
            stderr: output.stderr.trim_end().to_string(),
        }
    }
}

/// Narrow interface over subprocess execution.
///
/// The lifecycle runs every external command through this trait, which keeps
/// stage sequencing and error classification testable with a fake runner.
pub trait ProcessRunner {
    /// Run the command and capture its exit status and output.
    ///
    /// Only failure to launch is an error here; a non-zero exit comes back
    /// as a [`ProcessOutput`].
    fn run(&self, cmd: &ProcessBuilder) -> Result<ProcessOutput, CommandError>;

    /// Run the command and require a zero exit code.
    fn run_checked(&self, cmd: &ProcessBuilder) -> Result<ProcessOutput, CommandError> {
        let output = self.run(cmd)?;
        if !output.success() {
            return Err(CommandError::failed(cmd, &output));
        }
        Ok(output)
    }
}

/// [`ProcessRunner`] backed by real process execution.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, cmd: &ProcessBuilder) -> Result<ProcessOutput, CommandError> {
        cmd.exec()
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

/// Verify that the named tools are reachable in PATH.
///
/// Used by the CLI before starting a stage so a missing tool fails with a
/// clear message instead of mid-run.
pub fn require_tools(names: &[&str]) -> anyhow::Result<()> {
    for name in names {
        if find_executable(name).is_none() {
            bail!(
                "`{}` not found\n\
                 \n\
                 The package lifecycle delegates to `{}`.\n\
                 Install it and ensure it's in your PATH.",
                name,
                name
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_command() {
        let pb = ProcessBuilder::new("git").args(["clone", "https://example.com/repo.git", "."]);

        assert_eq!(
            pb.display_command(),
            "git clone https://example.com/repo.git ."
        );
    }

    #[test]
    fn test_exec_captures_stdout() {
        let output = ProcessBuilder::new("echo").arg("hello").exec().unwrap();

        assert!(output.success());
        assert!(output.stdout.contains("hello"));
    }

    #[test]
    fn test_run_checked_reports_exit_code() {
        let cmd = ProcessBuilder::new("bash").args(["-c", "echo boom >&2; exit 7"]);
        let err = SystemRunner.run_checked(&cmd).unwrap_err();

        match err {
            CommandError::Failed { code, stderr, .. } => {
                assert_eq!(code, Some(7));
                assert!(stderr.contains("boom"));
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn test_spawn_error_classified() {
        let cmd = ProcessBuilder::new("definitely-not-a-real-tool-xyz");
        let err = SystemRunner.run(&cmd).unwrap_err();

        assert!(matches!(err, CommandError::Spawn { .. }));
    }
}
