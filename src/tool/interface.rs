//! tool::interface
//!
//! Child-process implementation of the tool interface.
//!
//! # Error Handling
//!
//! A child that runs and exits non-zero is *not* an error here: its exit
//! code is data for the caller. [`ToolError`] covers only failures to run
//! the child at all:
//! - [`ToolError::EmptyCommand`]: nothing to run
//! - [`ToolError::Spawn`]: the executable could not be started
//!
//! # Example
//!
//! ```no_run
//! use ruffwrap::tool::{ProcessRunner, Runner};
//! use std::path::Path;
//!
//! let argv = vec!["ruff".to_string(), "check".to_string(), "--show-files".to_string()];
//! let output = ProcessRunner.capture(Path::new("src"), &argv)?;
//! for line in output.stdout.lines() {
//!     println!("{}", line);
//! }
//! # Ok::<(), ruffwrap::tool::ToolError>(())
//! ```

use std::path::Path;
use std::process::{Command, ExitStatus};

use thiserror::Error;
use tracing::debug;

/// Errors running a child process.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The command line was empty.
    #[error("empty command line")]
    EmptyCommand,

    /// The child could not be started (missing executable, permissions).
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// The program that failed to start
        program: String,
        /// The underlying OS error
        source: std::io::Error,
    },
}

/// Captured result of a child invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Normalized exit code.
    pub code: i32,
    /// Standard output (lossily decoded).
    pub stdout: String,
    /// Standard error (lossily decoded).
    pub stderr: String,
}

impl ToolOutput {
    /// Check whether the child exited with code zero.
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Invokes the wrapped tool.
///
/// `argv[0]` is the program; it is looked up on `PATH` when it has no
/// directory component. Each call blocks until the child exits.
pub trait Runner {
    /// Run `argv` in `dir`, capturing stdout and stderr.
    fn capture(&self, dir: &Path, argv: &[String]) -> Result<ToolOutput, ToolError>;

    /// Run `argv` in `dir` with inherited stdio, returning its exit code.
    fn status(&self, dir: &Path, argv: &[String]) -> Result<i32, ToolError>;

    /// Replace the current process with `argv` running in `dir`.
    ///
    /// Where process replacement is available this returns only on failure.
    /// Elsewhere the child is run to completion and its exit code returned.
    fn replace(&self, dir: &Path, argv: &[String]) -> Result<i32, ToolError>;
}

/// [`Runner`] backed by `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    fn command(dir: &Path, argv: &[String]) -> Result<Command, ToolError> {
        let (program, args) = argv.split_first().ok_or(ToolError::EmptyCommand)?;
        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(dir);
        Ok(cmd)
    }

    fn spawn_error(argv: &[String], source: std::io::Error) -> ToolError {
        ToolError::Spawn {
            program: argv.first().cloned().unwrap_or_default(),
            source,
        }
    }
}

impl Runner for ProcessRunner {
    fn capture(&self, dir: &Path, argv: &[String]) -> Result<ToolOutput, ToolError> {
        debug!(dir = %dir.display(), ?argv, "capture");
        let output = Self::command(dir, argv)?
            .output()
            .map_err(|e| Self::spawn_error(argv, e))?;
        Ok(ToolOutput {
            code: exit_code(output.status),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn status(&self, dir: &Path, argv: &[String]) -> Result<i32, ToolError> {
        debug!(dir = %dir.display(), ?argv, "run");
        let status = Self::command(dir, argv)?
            .status()
            .map_err(|e| Self::spawn_error(argv, e))?;
        Ok(exit_code(status))
    }

    #[cfg(unix)]
    fn replace(&self, dir: &Path, argv: &[String]) -> Result<i32, ToolError> {
        use std::os::unix::process::CommandExt;

        debug!(dir = %dir.display(), ?argv, "exec");
        // exec() only returns on error
        let err = Self::command(dir, argv)?.exec();
        Err(Self::spawn_error(argv, err))
    }

    #[cfg(not(unix))]
    fn replace(&self, dir: &Path, argv: &[String]) -> Result<i32, ToolError> {
        self.status(dir, argv)
    }
}

/// Normalize an exit status to a single code.
///
/// A child killed by a signal reports `128 + signal`, as shells do.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["sh".into(), "-c".into(), script.into()]
    }

    #[test]
    fn capture_collects_streams_and_code() {
        let tmp = tempfile::tempdir().unwrap();
        let output = ProcessRunner
            .capture(tmp.path(), &sh("echo out; echo err >&2; exit 4"))
            .unwrap();
        assert_eq!(output.code, 4);
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
        assert!(!output.success());
    }

    #[test]
    fn runs_in_requested_directory() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("marker.py"), "").unwrap();
        let output = ProcessRunner.capture(tmp.path(), &sh("ls")).unwrap();
        assert!(output.success());
        assert_eq!(output.stdout.trim(), "marker.py");
    }

    #[test]
    fn status_returns_exit_code() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(ProcessRunner.status(tmp.path(), &sh("exit 0")).unwrap(), 0);
        assert_eq!(ProcessRunner.status(tmp.path(), &sh("exit 7")).unwrap(), 7);
    }

    #[test]
    fn signal_death_maps_above_128() {
        let tmp = tempfile::tempdir().unwrap();
        let code = ProcessRunner.status(tmp.path(), &sh("kill -9 $$")).unwrap();
        assert_eq!(code, 128 + 9);
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let tmp = tempfile::tempdir().unwrap();
        let argv = vec!["/nonexistent/ruffwrap-test-binary".to_string()];
        let err = ProcessRunner.capture(tmp.path(), &argv).unwrap_err();
        assert!(matches!(err, ToolError::Spawn { .. }));
        assert!(err.to_string().contains("/nonexistent/ruffwrap-test-binary"));
    }

    #[test]
    fn empty_command_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            ProcessRunner.status(tmp.path(), &[]),
            Err(ToolError::EmptyCommand)
        ));
    }
}
