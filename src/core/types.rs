//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`ModeName`] - Validated batch mode name
//! - [`RunResult`] - Aggregate exit code across directory buckets
//!
//! # Exit Codes
//!
//! The wrapper produces a small, fixed set of exit codes of its own. Every
//! other non-zero code it returns is a code observed from a child invocation
//! of the wrapped tool.
//!
//! # Examples
//!
//! ```
//! use ruffwrap::core::types::{ModeName, RunResult};
//!
//! let mode = ModeName::new("hook-fix").unwrap();
//! assert_eq!(mode.as_str(), "hook-fix");
//! assert!(ModeName::new("has space").is_err());
//!
//! let mut result = RunResult::success();
//! result.record(2);
//! result.record(1);
//! assert_eq!(result.code(), 2);
//! ```

use std::borrow::Borrow;
use std::fmt;

use thiserror::Error;

/// Success.
pub const EXIT_SUCCESS: i32 = 0;

/// Minimum code recorded when a required batch mode is undefined.
pub const EXIT_MODE_UNDEFINED: i32 = 1;

/// Code for errors that abort the whole run (e.g. the settings probe failed).
pub const EXIT_FATAL: i32 = 1;

/// Code for passthrough tokens found before the `--` path-list delimiter.
pub const EXIT_BAD_ARGS: i32 = 3;

/// Code for "no usable executable" or a failed process replacement.
pub const EXIT_TOOL_NOT_FOUND: i32 = 200;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid mode name: {0}")]
    InvalidModeName(String),
}

/// A validated batch mode name.
///
/// Mode names appear inside sentinel tokens, so they are restricted to
/// ASCII alphanumerics, `-` and `_`.
///
/// # Example
///
/// ```
/// use ruffwrap::core::types::ModeName;
///
/// assert!(ModeName::new("verify").is_ok());
/// assert!(ModeName::new("my_mode-2").is_ok());
/// assert!(ModeName::new("").is_err());
/// assert!(ModeName::new("a.b").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModeName(String);

impl ModeName {
    /// Create a new validated mode name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidModeName` if the name is empty or contains
    /// characters outside `[A-Za-z0-9_-]`.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if name.is_empty() {
            return Err(TypeError::InvalidModeName(
                "mode name cannot be empty".into(),
            ));
        }
        if let Some(c) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(TypeError::InvalidModeName(format!(
                "'{}' contains invalid character {:?}",
                name, c
            )));
        }
        Ok(Self(name))
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ModeName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ModeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Aggregate exit code of a run.
///
/// The aggregate is the maximum of every recorded code and starts at zero,
/// so recording a success never masks an earlier failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunResult {
    code: i32,
}

impl RunResult {
    /// A result with nothing recorded.
    pub fn success() -> Self {
        Self { code: EXIT_SUCCESS }
    }

    /// Record one observed exit code.
    pub fn record(&mut self, code: i32) {
        self.code = self.code.max(code);
    }

    /// The aggregate exit code.
    pub fn code(&self) -> i32 {
        self.code
    }

    /// Whether no failure has been recorded.
    pub fn is_success(&self) -> bool {
        self.code == EXIT_SUCCESS
    }
}
