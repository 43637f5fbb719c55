//! engine::resolve
//!
//! Executable resolution: which command-line prefix runs the tool.
//!
//! # Resolution Order
//!
//! 1. With `RUFFWRAP_SKIP` set, only `RUFFWRAP_EXEC` is consulted (a sentinel
//!    override is never applied).
//! 2. Otherwise the current directory's exec sentinel, then `RUFFWRAP_EXEC`.
//! 3. `ruff` on `PATH`.
//! 4. `uvx` on `PATH`, giving the two-token prefix `uvx ruff`.
//! 5. Otherwise [`ResolveError::NotFound`].
//!
//! Configured values are shell-word split, so `uvx --from ruff==0.6.9 ruff`
//! works as an override. Paths found on `PATH` are used verbatim.
//!
//! Resolution is recomputed for every directory and never cached.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::config::Settings;

/// Name of the wrapped tool's binary.
pub const TOOL_NAME: &str = "ruff";

/// Launcher that can run the tool by name.
pub const LAUNCHER_NAME: &str = "uvx";

/// Executable search function (`PATH` lookup in production).
pub type Lookup = fn(&str) -> Option<PathBuf>;

/// Errors from executable resolution.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// Nothing configured and nothing found on `PATH`.
    #[error("{}, {} not found on PATH", TOOL_NAME, LAUNCHER_NAME)]
    NotFound,

    /// A configured executable could not be shell-word split.
    #[error("cannot split executable {value:?}: {message}")]
    Unsplittable { value: String, message: String },

    /// A configured executable split into nothing.
    #[error("executable {value:?} is empty")]
    Empty { value: String },
}

/// Resolve the command-line prefix for the tool.
///
/// # Example
///
/// ```
/// use ruffwrap::core::config::Settings;
/// use ruffwrap::engine::resolve::resolve_prefix;
/// use std::path::PathBuf;
///
/// fn uvx_only(name: &str) -> Option<PathBuf> {
///     (name == "uvx").then(|| PathBuf::from("/usr/bin/uvx"))
/// }
///
/// let prefix = resolve_prefix(&Settings::default(), None, uvx_only).unwrap();
/// assert_eq!(prefix, vec!["/usr/bin/uvx", "ruff"]);
/// ```
pub fn resolve_prefix(
    settings: &Settings,
    exec_override: Option<&str>,
    lookup: Lookup,
) -> Result<Vec<String>, ResolveError> {
    let configured = if settings.skip {
        settings.default_exec.as_deref()
    } else {
        exec_override.or(settings.default_exec.as_deref())
    };

    if let Some(value) = configured {
        return split_exec(value);
    }
    if let Some(path) = lookup(TOOL_NAME) {
        return Ok(vec![path.to_string_lossy().into_owned()]);
    }
    if let Some(path) = lookup(LAUNCHER_NAME) {
        return Ok(vec![
            path.to_string_lossy().into_owned(),
            TOOL_NAME.to_string(),
        ]);
    }
    Err(ResolveError::NotFound)
}

fn split_exec(value: &str) -> Result<Vec<String>, ResolveError> {
    let argv = shell_words::split(value).map_err(|e| ResolveError::Unsplittable {
        value: value.to_string(),
        message: e.to_string(),
    })?;
    if argv.is_empty() {
        return Err(ResolveError::Empty {
            value: value.to_string(),
        });
    }
    Ok(argv)
}

/// Look `name` up on `PATH`.
pub fn which_lookup(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}
