//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Command echo respects the verbosity counter: mode commands and the
//! single-mode invocation are echoed from `--verbose`, settings probes and
//! file listings from `--verbose --verbose`. Errors are always shown.

use std::fmt::Display;

/// Output verbosity (count of `--verbose` flags).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Verbosity(pub u8);

impl Verbosity {
    /// Threshold for echoing commands that do the actual work.
    pub const COMMANDS: Verbosity = Verbosity(1);
    /// Threshold for echoing discovery invocations.
    pub const PROBES: Verbosity = Verbosity(2);

    /// Whether output gated at `threshold` is shown.
    pub fn shows(self, threshold: Verbosity) -> bool {
        self >= threshold
    }
}

/// Format the echo line for a command run in `rel_dir`.
///
/// The directory prefix is omitted for the invocation root.
pub fn format_command(rel_dir: &str, argv: &[String]) -> String {
    let prefix = if rel_dir.is_empty() || rel_dir == "." {
        String::new()
    } else {
        format!("{} $ ", rel_dir)
    };
    format!("<<< {}{} >>>", prefix, shell_words::join(argv))
}

/// Echo a command line if `verbosity` reaches `threshold`.
pub fn command(rel_dir: &str, argv: &[String], verbosity: Verbosity, threshold: Verbosity) {
    if verbosity.shows(threshold) {
        eprintln!("{}", format_command(rel_dir, argv));
    }
}

/// Print a diagnostic message as-is (always shown).
pub fn report(message: impl Display) {
    eprintln!("{}", message);
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}
