//! Test utilities for exercising the lifecycle without real subprocesses.
//!
//! The lifecycle talks to `git`, `bash`, and `cmake` through the
//! [`ProcessRunner`] seam, so tests swap in a [`ScriptedRunner`] that
//! returns canned outputs and records every command it was asked to run.
//!
//! # Example
//!
//! ```rust,ignore
//! use cppkg_recipe::test_support::{CannedOutput, ScriptedRunner};
//!
//! #[test]
//! fn test_example() {
//!     let runner = ScriptedRunner::new();
//!     runner.expect_prefix("git clone", CannedOutput::success());
//!
//!     // Drive code under test with &runner...
//!     assert_eq!(runner.calls().len(), 1);
//! }
//! ```

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{bail, Result};

use crate::recipe::settings::{Compiler, Os, Settings};
use crate::util::process::{CommandError, ProcessBuilder, ProcessOutput, ProcessRunner};

/// Canned output returned for a matched command.
#[derive(Debug, Clone)]
pub struct CannedOutput {
    /// Exit status code (0 = success).
    pub status: i32,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
}

impl CannedOutput {
    /// A silent successful exit.
    pub fn success() -> Self {
        CannedOutput {
            status: 0,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    /// A successful exit printing `stdout`.
    pub fn with_output(stdout: impl Into<String>) -> Self {
        CannedOutput {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed exit with the given status code.
    pub fn failure(status: i32) -> Self {
        CannedOutput {
            status,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    /// Attach standard error output.
    pub fn stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = stderr.into();
        self
    }
}

impl Default for CannedOutput {
    fn default() -> Self {
        CannedOutput::success()
    }
}

/// Pattern for matching rendered command lines.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on the full command line.
    Exact(String),
    /// Match if the command line starts with the prefix.
    StartsWith(String),
    /// Match if the command line contains the substring.
    Contains(String),
    /// Match using a regex pattern.
    Regex(String),
    /// Match any command.
    Any,
}

impl CommandPattern {
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s),
            CommandPattern::Contains(s) => cmd.contains(s),
            CommandPattern::Regex(pattern) => regex::Regex::new(pattern)
                .map(|re| re.is_match(cmd))
                .unwrap_or(false),
            CommandPattern::Any => true,
        }
    }
}

/// One scripted expectation.
#[derive(Debug, Clone)]
pub struct CommandExpectation {
    /// Pattern to match against command lines.
    pub pattern: CommandPattern,
    /// Output to return when matched.
    pub output: CannedOutput,
    /// Number of times this expectation can be used (None = unlimited).
    pub times: Option<usize>,
    /// Number of times this expectation has been used.
    pub used: usize,
}

impl CommandExpectation {
    pub fn new(pattern: CommandPattern, output: CannedOutput) -> Self {
        CommandExpectation {
            pattern,
            output,
            times: None,
            used: 0,
        }
    }

    /// Limit how many times this expectation may match.
    pub fn times(mut self, n: usize) -> Self {
        self.times = Some(n);
        self
    }

    fn available(&self) -> bool {
        match self.times {
            Some(n) => self.used < n,
            None => true,
        }
    }
}

/// A command the runner was asked to execute.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// The rendered command line.
    pub command: String,
    /// Working directory the command was given, if any.
    pub cwd: Option<PathBuf>,
}

/// A [`ProcessRunner`] that replays scripted outputs.
///
/// Expectations are matched in registration order; the first available
/// match wins. Commands with no matching expectation fail, so a test also
/// asserts that nothing unexpected was spawned.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    expectations: Mutex<Vec<CommandExpectation>>,
    calls: Mutex<Vec<RecordedCall>>,
    default_output: Mutex<Option<CannedOutput>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        ScriptedRunner::default()
    }

    /// Expect an exact command line.
    pub fn expect(&self, cmd: &str, output: CannedOutput) -> &Self {
        self.expect_pattern(CommandExpectation::new(
            CommandPattern::Exact(cmd.to_string()),
            output,
        ))
    }

    /// Expect a command line starting with a prefix.
    pub fn expect_prefix(&self, prefix: &str, output: CannedOutput) -> &Self {
        self.expect_pattern(CommandExpectation::new(
            CommandPattern::StartsWith(prefix.to_string()),
            output,
        ))
    }

    /// Expect a command line containing a substring.
    pub fn expect_contains(&self, substring: &str, output: CannedOutput) -> &Self {
        self.expect_pattern(CommandExpectation::new(
            CommandPattern::Contains(substring.to_string()),
            output,
        ))
    }

    /// Register a custom expectation.
    pub fn expect_pattern(&self, expectation: CommandExpectation) -> &Self {
        self.expectations.lock().unwrap().push(expectation);
        self
    }

    /// Output for commands no expectation matches.
    pub fn set_default(&self, output: CannedOutput) -> &Self {
        *self.default_output.lock().unwrap() = Some(output);
        self
    }

    /// All commands run so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Check that every expectation with a `times` bound was fully used.
    pub fn verify(&self) -> Result<()> {
        for (i, exp) in self.expectations.lock().unwrap().iter().enumerate() {
            if let Some(expected) = exp.times {
                if exp.used != expected {
                    bail!(
                        "expectation {} was used {} times, expected {}",
                        i,
                        exp.used,
                        expected
                    );
                }
            }
        }
        Ok(())
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run(&self, cmd: &ProcessBuilder) -> Result<ProcessOutput, CommandError> {
        let command = cmd.display_command();
        self.calls.lock().unwrap().push(RecordedCall {
            command: command.clone(),
            cwd: cmd.get_cwd().map(|p| p.to_path_buf()),
        });

        for exp in self.expectations.lock().unwrap().iter_mut() {
            if exp.pattern.matches(&command) && exp.available() {
                exp.used += 1;
                return Ok(ProcessOutput {
                    code: Some(exp.output.status),
                    stdout: exp.output.stdout.clone(),
                    stderr: exp.output.stderr.clone(),
                });
            }
        }

        if let Some(default) = self.default_output.lock().unwrap().as_ref() {
            return Ok(ProcessOutput {
                code: Some(default.status),
                stdout: default.stdout.clone(),
                stderr: default.stderr.clone(),
            });
        }

        Err(CommandError::Failed {
            command,
            code: None,
            stderr: "no scripted output for this command".to_string(),
        })
    }
}

/// Settings for a Linux gcc host.
pub fn linux_gcc() -> Settings {
    Settings {
        os: Os::Linux,
        compiler: Compiler::new("gcc").with_version("13"),
        build_type: "Release".to_string(),
        arch: "x86_64".to_string(),
    }
}

/// Settings for a Windows Visual Studio host at an optional version.
pub fn windows_msvc(version: Option<&str>) -> Settings {
    let mut compiler = Compiler::new("Visual Studio");
    if let Some(version) = version {
        compiler = compiler.with_version(version);
    }
    Settings {
        os: Os::Windows,
        compiler,
        build_type: "Release".to_string(),
        arch: "x86_64".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_runner_matches_in_order() {
        let runner = ScriptedRunner::new();
        runner.expect("git --version", CannedOutput::with_output("git 2.43.0"));
        runner.expect_prefix("cmake", CannedOutput::success());

        let output = runner
            .run(&ProcessBuilder::new("git").arg("--version"))
            .unwrap();
        assert!(output.success());
        assert_eq!(output.stdout, "git 2.43.0");

        let output = runner
            .run(&ProcessBuilder::new("cmake").arg("--build").arg("build"))
            .unwrap();
        assert!(output.success());

        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].command, "git --version");
    }

    #[test]
    fn test_unmatched_command_fails() {
        let runner = ScriptedRunner::new();
        let err = runner.run(&ProcessBuilder::new("unknown")).unwrap_err();
        assert!(err.to_string().contains("unknown"));
    }

    #[test]
    fn test_expectation_times_exhausted() {
        let runner = ScriptedRunner::new();
        runner.expect_pattern(
            CommandExpectation::new(CommandPattern::Any, CannedOutput::success()).times(1),
        );

        assert!(runner.run(&ProcessBuilder::new("once")).is_ok());
        assert!(runner.run(&ProcessBuilder::new("twice")).is_err());
        runner.verify().unwrap();
    }

    #[test]
    fn test_default_output_catches_everything() {
        let runner = ScriptedRunner::new();
        runner.set_default(CannedOutput::success());

        assert!(runner.run(&ProcessBuilder::new("anything")).is_ok());
    }

    #[test]
    fn test_regex_pattern() {
        let pattern = CommandPattern::Regex("^git (clone|checkout)".to_string());
        assert!(pattern.matches("git clone https://example.com/repo.git ."));
        assert!(pattern.matches("git checkout main"));
        assert!(!pattern.matches("git status"));
    }
}
