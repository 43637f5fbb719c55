//! core::sentinel
//!
//! Sentinel token recognition in the wrapped tool's settings dump.
//!
//! # Background
//!
//! Sentinels are smuggled into Ruff configuration as otherwise inert
//! entries of the `builtins` list, so that `ruff check --show-settings`
//! becomes the discovery channel and no separate config format is needed:
//!
//! ```text
//! linter.builtins = [
//!     __RUFFWRAP_EXEC__uvx ruff@0.6.9,
//!     __RUFFWRAP_MODE_hook_DEFAULT_DEFINITION__,
//!     __RUFFWRAP_MODE_lint_CMD_0__check --select E,
//! ]
//! ```
//!
//! # Scanning Rules
//!
//! - Lines before the header (`linter.builtins = [`) are ignored.
//! - Scanning stops at the first line whose last character is `]`.
//! - Each line is matched against the sentinel kinds in a fixed priority
//!   order (exec, default definition, indexed command); the first match
//!   wins. Lines matching nothing are skipped.
//!
//! Parsing never performs I/O. A sentinel that matches but cannot be
//! decoded is kept in [`DirectoryScope::rejected`] for the caller to report.
//!
//! # Example
//!
//! ```
//! use ruffwrap::core::sentinel::{parse_settings, SentinelGrammar};
//!
//! let grammar = SentinelGrammar::new("RUFFWRAP").unwrap();
//! let dump = "linter.builtins = [\n\t__RUFFWRAP_EXEC__uvx ruff@0.6.9,\n]\n";
//! let scope = parse_settings(&grammar, dump);
//! assert_eq!(scope.exec_override.as_deref(), Some("uvx ruff@0.6.9"));
//! ```

use regex::{Captures, Regex};
use thiserror::Error;

use super::modes::ModeRegistry;
use super::types::ModeName;

/// Sentinel namespace used by the `ruffwrap` binary.
pub const DEFAULT_NAMESPACE: &str = "RUFFWRAP";

/// Line that opens the list sentinels are embedded in.
pub const SETTINGS_HEADER: &str = "linter.builtins = [";

/// Errors decoding a matched sentinel.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SentinelError {
    /// Mode name failed validation.
    #[error("{0}")]
    InvalidMode(String),

    /// Command index does not fit the index type.
    #[error("mode {mode}: command index {index} is out of range")]
    IndexOutOfRange { mode: String, index: String },

    /// Command tokens could not be shell-word split.
    #[error("mode {mode}: cannot split command {index}: {message}")]
    MalformedCommand {
        mode: String,
        index: u32,
        message: String,
    },
}

/// One recognized sentinel token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sentinel {
    /// Executable override (`__NS_EXEC__<value>,`).
    Exec(String),
    /// Standard definition activation (`__NS_MODE_<name>_DEFAULT_DEFINITION__,`).
    DefaultDefinition(ModeName),
    /// Indexed command (`__NS_MODE_<name>_CMD_<index>__<tokens>,`).
    Command {
        mode: ModeName,
        index: u32,
        argv: Vec<String>,
    },
}

/// Compiled sentinel patterns for one namespace.
#[derive(Debug, Clone)]
pub struct SentinelGrammar {
    exec: Regex,
    default_definition: Regex,
    command: Regex,
}

impl SentinelGrammar {
    /// Compile the patterns for `namespace` (e.g. `RUFFWRAP` or `WRAP`).
    pub fn new(namespace: &str) -> Result<Self, regex::Error> {
        let ns = regex::escape(namespace);
        Ok(Self {
            exec: Regex::new(&format!(r"__{ns}_EXEC__(?P<exec>.+),$"))?,
            default_definition: Regex::new(&format!(
                r"__{ns}_MODE_(?P<mode>[a-zA-Z0-9_-]+)_DEFAULT_DEFINITION__,$"
            ))?,
            command: Regex::new(&format!(
                r"__{ns}_MODE_(?P<mode>[a-zA-Z0-9_-]+)_CMD_(?P<index>\d+)__(?P<args>.*),$"
            ))?,
        })
    }

    /// Match one line against every sentinel kind, first match wins.
    ///
    /// Returns `None` if the line holds no sentinel.
    pub fn match_line(&self, line: &str) -> Option<Result<Sentinel, SentinelError>> {
        if let Some(caps) = self.exec.captures(line) {
            return Some(Ok(Sentinel::Exec(caps["exec"].to_string())));
        }
        if let Some(caps) = self.default_definition.captures(line) {
            return Some(mode_of(&caps).map(Sentinel::DefaultDefinition));
        }
        if let Some(caps) = self.command.captures(line) {
            return Some(decode_command(&caps));
        }
        None
    }
}

fn mode_of(caps: &Captures<'_>) -> Result<ModeName, SentinelError> {
    ModeName::new(&caps["mode"]).map_err(|e| SentinelError::InvalidMode(e.to_string()))
}

fn decode_command(caps: &Captures<'_>) -> Result<Sentinel, SentinelError> {
    let mode = mode_of(caps)?;
    let index: u32 = caps["index"]
        .parse()
        .map_err(|_| SentinelError::IndexOutOfRange {
            mode: mode.to_string(),
            index: caps["index"].to_string(),
        })?;
    let argv = shell_words::split(&caps["args"]).map_err(|e| SentinelError::MalformedCommand {
        mode: mode.to_string(),
        index,
        message: e.to_string(),
    })?;
    Ok(Sentinel::Command { mode, index, argv })
}

/// Orchestration state discovered for one directory.
///
/// Built fresh for every directory and never carried over, so one
/// directory's executable override cannot leak into the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryScope {
    /// Executable override from the last exec sentinel, if any.
    pub exec_override: Option<String>,
    /// Modes defined by this directory's sentinels.
    pub modes: ModeRegistry,
    /// Sentinels that matched but could not be decoded.
    pub rejected: Vec<SentinelError>,
}

impl DirectoryScope {
    /// An empty scope (no sentinels found).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Apply one sentinel to this scope.
    pub fn apply(&mut self, sentinel: Sentinel) {
        match sentinel {
            Sentinel::Exec(value) => self.exec_override = Some(value),
            Sentinel::DefaultDefinition(mode) => self.modes.activate_standard(mode),
            Sentinel::Command { mode, index, argv } => {
                self.modes.record_command(mode, index, argv)
            }
        }
    }
}

/// Scan a settings dump and collect every sentinel into a fresh scope.
pub fn parse_settings(grammar: &SentinelGrammar, dump: &str) -> DirectoryScope {
    let mut scope = DirectoryScope::empty();
    let mut in_block = false;

    for line in dump.lines() {
        if !in_block {
            if !line.starts_with(SETTINGS_HEADER) {
                continue;
            }
            in_block = true;
        }

        if line.ends_with(']') {
            break;
        }

        match grammar.match_line(line) {
            Some(Ok(sentinel)) => scope.apply(sentinel),
            Some(Err(err)) => scope.rejected.push(err),
            None => {}
        }
    }

    scope
}
