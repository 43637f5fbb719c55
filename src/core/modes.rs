//! core::modes
//!
//! Batch mode definitions: indexed command sequences and the registry that
//! maps mode names to them.
//!
//! # Lifecycle
//!
//! A [`ModeRegistry`] is built from the sentinels found in one directory's
//! settings view and discarded when the next directory is scanned. Nothing
//! here outlives a directory.
//!
//! # Standard Definitions
//!
//! Four mode names have built-in sequences that a single
//! `DEFAULT_DEFINITION` sentinel activates. Each one interleaves formatter
//! runs with linter fix/re-check runs, because either pass can invalidate
//! the other's output. Convergence is best effort; `enroll` in particular may
//! need to be re-run by hand in rare cases.
//!
//! # Example
//!
//! ```
//! use ruffwrap::core::modes::ModeRegistry;
//!
//! let mut modes = ModeRegistry::new();
//! modes.record_command("lint", 5, vec!["format".into()]);
//! modes.record_command("lint", 0, vec!["check".into()]);
//!
//! let order: Vec<u32> = modes.get("lint").unwrap().iter().map(|(i, _)| i).collect();
//! assert_eq!(order, vec![0, 5]);
//! assert!(modes.get("verify").is_none());
//! ```

use std::collections::BTreeMap;

use tracing::debug;

use super::types::ModeName;

/// Ordered mapping from command index to argument vector.
///
/// Indices need not be contiguous; iteration is always in ascending index
/// order regardless of the order commands were recorded in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSequence {
    commands: BTreeMap<u32, Vec<String>>,
}

impl CommandSequence {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sequence from already-tokenized commands, indexed from zero.
    pub fn from_commands(commands: &[&[&str]]) -> Self {
        let commands = commands
            .iter()
            .zip(0u32..)
            .map(|(argv, index)| (index, argv.iter().map(|s| s.to_string()).collect()))
            .collect();
        Self { commands }
    }

    /// Set the command at `index`, replacing any previous one.
    pub fn insert(&mut self, index: u32, argv: Vec<String>) {
        self.commands.insert(index, argv);
    }

    /// Get the command at `index`.
    pub fn get(&self, index: u32) -> Option<&[String]> {
        self.commands.get(&index).map(Vec::as_slice)
    }

    /// Iterate commands in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[String])> {
        self.commands.iter().map(|(i, argv)| (*i, argv.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Built-in mode definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardDefinition {
    /// Pre-commit hook and run-on-save: check without fixes, then format.
    Hook,
    /// Like `Hook`, but the first check applies fixes. Not meant for
    /// run-on-save, where fixing an unused variable mid-edit loses work.
    HookFix,
    /// CI verification: uncached check and format check, no modifications.
    Verify,
    /// Initial enrollment of a legacy codebase, or re-enrollment after a
    /// tool upgrade or configuration change.
    Enroll,
}

impl StandardDefinition {
    /// All built-in definitions.
    pub const ALL: [StandardDefinition; 4] = [Self::Hook, Self::HookFix, Self::Verify, Self::Enroll];

    /// Look up a built-in definition by mode name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "hook" => Some(Self::Hook),
            "hook-fix" => Some(Self::HookFix),
            "verify" => Some(Self::Verify),
            "enroll" => Some(Self::Enroll),
            _ => None,
        }
    }

    /// The mode name that activates this definition.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hook => "hook",
            Self::HookFix => "hook-fix",
            Self::Verify => "verify",
            Self::Enroll => "enroll",
        }
    }

    /// Build the command sequence for this definition.
    pub fn sequence(&self) -> CommandSequence {
        match self {
            Self::Hook => hook_sequence("--no-fix"),
            Self::HookFix => hook_sequence("--fix"),
            Self::Verify => CommandSequence::from_commands(&[
                &["check", "--no-fix", "--no-cache", "--config", "cache-dir = '/dev/null'"],
                &["format", "--check", "--no-cache", "--config", "cache-dir = '/dev/null'"],
            ]),
            Self::Enroll => CommandSequence::from_commands(&[
                // Format first; enrollment accepts whatever changes are needed.
                &["format"],
                // A noqa for PLR2044 (empty-comment) hides the empty comment,
                // which later gets stripped as unused and brings the problem
                // back. Fix it outright instead.
                &["check", "--fix-only", "--select", "PLR2044", "--quiet"],
                &["check", "--add-noqa"],
                &["format", "--quiet"],
                // Strip every noqa (all other rules off makes them all unused),
                // then add them back where the formatter left the code.
                &["check", "--fix-only", "--select", "RUF100", "--quiet"],
                &["check", "--add-noqa", "--quiet"],
                &["format", "--quiet"],
                &["check", "--add-noqa", "--quiet"],
                &["format", "--quiet"],
                // If this still fails, re-run the mode a few times.
                &["check", "--no-fix", "--quiet"],
            ]),
        }
    }
}

fn hook_sequence(fix_arg: &str) -> CommandSequence {
    CommandSequence::from_commands(&[
        &["check", fix_arg],
        &["format"],
        // Formatting can move code away from its noqa comments. Remove all
        // noqas (RUF100 alone makes every noqa unused) and re-add them.
        &["check", "--fix-only", "--select", "RUF100", "--quiet"],
        &["check", "--add-noqa", "--quiet"],
        // The re-added noqas can push a line past the formatter's limits.
        &["format", "--quiet"],
        &["check", "--fix-only", "--select", "RUF100", "--quiet"],
        &["check", "--add-noqa", "--quiet"],
        // Report remaining lint instability without failing the hook.
        &["check", "--exit-zero", "--no-fix", "--output-format=json-lines"],
        &["format", "--quiet", "--check"],
    ])
}

/// Mode name to command sequence mapping for one directory.
///
/// A name absent from the registry is *undefined*, which is distinct from a
/// name present with an empty sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeRegistry {
    modes: BTreeMap<ModeName, CommandSequence>,
}

impl ModeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate the standard definition for `mode`.
    ///
    /// Replaces anything recorded for the mode so far. Unknown names are
    /// installed as defined-but-empty.
    pub fn activate_standard(&mut self, mode: ModeName) {
        let sequence = match StandardDefinition::from_name(mode.as_str()) {
            Some(definition) => definition.sequence(),
            None => {
                debug!("no standard definition for mode {}; defining it empty", mode);
                CommandSequence::new()
            }
        };
        self.modes.insert(mode, sequence);
    }

    /// Record one indexed command for `mode`, creating the mode if needed.
    ///
    /// Accepts a plain `&str` for convenience; names that are not valid
    /// [`ModeName`]s are ignored since no sentinel can produce them.
    pub fn record_command(&mut self, mode: impl AsRef<str>, index: u32, argv: Vec<String>) {
        let Ok(mode) = ModeName::new(mode.as_ref()) else {
            return;
        };
        self.modes.entry(mode).or_default().insert(index, argv);
    }

    /// Get the sequence for `mode`, or `None` if the mode is undefined.
    pub fn get(&self, mode: &str) -> Option<&CommandSequence> {
        self.modes.get(mode)
    }

    /// Check whether `mode` is defined (possibly empty).
    pub fn is_defined(&self, mode: &str) -> bool {
        self.modes.contains_key(mode)
    }

    /// Defined mode names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &ModeName> {
        self.modes.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }
}
