//! tool::mock
//!
//! Scripted runner for deterministic orchestration tests.
//!
//! # Design
//!
//! The mock answers every invocation through a responder closure and
//! records what was asked of it, so tests can assert both on the
//! orchestrator's result and on the exact command lines it issued.
//!
//! # Example
//!
//! ```ignore
//! let runner = MockRunner::new(|_dir, argv| {
//!     if argv.iter().any(|a| a == "--show-files") {
//!         Ok(mock::ok("/repo/a.py\n"))
//!     } else {
//!         Ok(mock::ok(""))
//!     }
//! });
//! ```

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use super::interface::{Runner, ToolError, ToolOutput};

type Responder = dyn Fn(&Path, &[String]) -> Result<ToolOutput, ToolError>;

/// How the runner was asked to invoke the child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationKind {
    Capture,
    Status,
    Replace,
}

/// One recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub kind: InvocationKind,
    pub dir: PathBuf,
    pub argv: Vec<String>,
}

impl Invocation {
    /// The command line joined with spaces, for compact assertions.
    pub fn line(&self) -> String {
        self.argv.join(" ")
    }
}

/// Mock runner.
pub struct MockRunner {
    responder: Box<Responder>,
    log: RefCell<Vec<Invocation>>,
}

impl MockRunner {
    /// Create a mock that answers through `responder`.
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&Path, &[String]) -> Result<ToolOutput, ToolError> + 'static,
    {
        Self {
            responder: Box::new(responder),
            log: RefCell::new(Vec::new()),
        }
    }

    /// A mock where every invocation succeeds with empty output.
    pub fn succeeding() -> Self {
        Self::new(|_, _| Ok(ok("")))
    }

    /// Every invocation so far, in order.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.log.borrow().clone()
    }

    /// Command lines of `Status` invocations, in order.
    pub fn status_lines(&self) -> Vec<String> {
        self.log
            .borrow()
            .iter()
            .filter(|i| i.kind == InvocationKind::Status)
            .map(Invocation::line)
            .collect()
    }

    fn respond(
        &self,
        kind: InvocationKind,
        dir: &Path,
        argv: &[String],
    ) -> Result<ToolOutput, ToolError> {
        self.log.borrow_mut().push(Invocation {
            kind,
            dir: dir.to_path_buf(),
            argv: argv.to_vec(),
        });
        (self.responder)(dir, argv)
    }
}

impl Runner for MockRunner {
    fn capture(&self, dir: &Path, argv: &[String]) -> Result<ToolOutput, ToolError> {
        self.respond(InvocationKind::Capture, dir, argv)
    }

    fn status(&self, dir: &Path, argv: &[String]) -> Result<i32, ToolError> {
        self.respond(InvocationKind::Status, dir, argv).map(|o| o.code)
    }

    fn replace(&self, dir: &Path, argv: &[String]) -> Result<i32, ToolError> {
        self.respond(InvocationKind::Replace, dir, argv).map(|o| o.code)
    }
}

/// Successful output with the given stdout.
pub fn ok(stdout: &str) -> ToolOutput {
    ToolOutput {
        code: 0,
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

/// Failed output with the given code and stderr.
pub fn failed(code: i32, stderr: &str) -> ToolOutput {
    ToolOutput {
        code,
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}

/// A spawn failure for `program`.
pub fn not_found(program: &str) -> ToolError {
    ToolError::Spawn {
        program: program.to_string(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
    }
}
