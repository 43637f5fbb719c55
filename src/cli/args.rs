//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Wrapper Options
//!
//! - `--mode <NAME>`: run the named mode over the listed files (batch)
//! - `--mode-require`: fail directories where the mode is not defined
//! - `--verbose`: echo commands; repeat to also echo discovery probes
//! - `--version` / `--help`
//!
//! Everything else is passed through to Ruff untouched.
//!
//! # Invocation Name
//!
//! When installed under another name (typically as `ruff` itself), every
//! wrapper option is spelled with a `ruffwrap-` prefix, e.g.
//! `--ruffwrap-mode=hook`, so plain Ruff options like `--verbose` keep
//! reaching Ruff. The name is taken from `RUFFWRAP_INVOKED_AS`, falling back
//! to `argv[0]`.
//!
//! # Splitting
//!
//! Wrapper options are recognized anywhere before a literal `--`, in both
//! `--opt=value` and `--opt value` form. The `--` and everything after it
//! are passthrough, as is any token that is not a wrapper option.

use std::path::Path;

use clap::{ArgAction, Parser};
use thiserror::Error;

use crate::core::config::Settings;
use crate::core::paths::PATH_LIST_DELIMITER;

/// Name under which wrapper options are unprefixed.
pub const CANONICAL_NAME: &str = "ruffwrap";

/// Prefix for wrapper options under any other invocation name.
pub const OPTION_PREFIX: &str = "ruffwrap-";

/// Wrapper flags that take no value.
const FLAGS: &[&str] = &["mode-require", "verbose", "version", "help"];

/// Wrapper options that take a value.
const VALUED: &[&str] = &["mode"];

/// Errors parsing the command line.
#[derive(Debug, Error)]
pub enum ArgsError {
    /// Rejected by clap, or a help/version request (see `clap::Error::kind`).
    #[error(transparent)]
    Parse(#[from] clap::Error),
}

/// Sentinel-driven Ruff wrapper.
///
/// Runs Ruff at the version pinned by the surrounding project's own Ruff
/// configuration, and runs named multi-step modes (`hook`, `verify`, ...)
/// over files grouped by directory.
#[derive(Parser, Debug, Default, PartialEq, Eq)]
#[command(name = "ruffwrap")]
#[command(about, long_about = None, disable_version_flag = true)]
pub struct Cli {
    /// Run the named mode over the listed files
    #[arg(long, value_name = "NAME")]
    pub mode: Option<String>,

    /// Fail when a directory does not define the mode
    #[arg(long)]
    pub mode_require: bool,

    /// Echo commands on stderr (repeat for discovery probes too)
    #[arg(long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print the version and exit
    #[arg(long)]
    pub version: bool,

    /// Arguments for Ruff (batch mode: the file list)
    #[arg(skip)]
    pub passthrough: Vec<String>,
}

impl Cli {
    /// Parse the process's own command line.
    pub fn parse_args(settings: &Settings) -> Result<Self, ArgsError> {
        let args = std::env::args_os()
            .map(|a| a.to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        Self::parse_with(&args, settings)
    }

    /// Parse `args` (including the program name at index 0).
    pub fn parse_with(args: &[String], settings: &Settings) -> Result<Self, ArgsError> {
        let (program, rest) = match args.split_first() {
            Some((program, rest)) => (program.as_str(), rest),
            None => (CANONICAL_NAME, &[][..]),
        };
        let invoked_as = settings.invoked_as.as_deref().unwrap_or(program);
        let (wrapper, passthrough) = partition_args(rest, option_prefix(invoked_as));

        let argv = std::iter::once(CANONICAL_NAME.to_string()).chain(wrapper);
        let mut cli = Cli::try_parse_from(argv)?;
        cli.passthrough = passthrough;
        Ok(cli)
    }
}

/// Option prefix for the given invocation name.
///
/// # Example
///
/// ```
/// use ruffwrap::cli::args::option_prefix;
///
/// assert_eq!(option_prefix("/usr/local/bin/ruffwrap"), "");
/// assert_eq!(option_prefix("/usr/local/bin/ruff"), "ruffwrap-");
/// ```
pub fn option_prefix(invoked_as: &str) -> &'static str {
    let name = Path::new(invoked_as)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if name == CANONICAL_NAME {
        ""
    } else {
        OPTION_PREFIX
    }
}

/// Split `args` into wrapper options (normalized to their unprefixed
/// spelling) and passthrough arguments, preserving order within each.
pub fn partition_args(args: &[String], prefix: &str) -> (Vec<String>, Vec<String>) {
    let mut wrapper = Vec::new();
    let mut passthrough = Vec::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        if arg == PATH_LIST_DELIMITER {
            passthrough.push(arg.clone());
            passthrough.extend(iter.by_ref().cloned());
            break;
        }

        let Some(option) = arg
            .strip_prefix("--")
            .and_then(|rest| rest.strip_prefix(prefix))
        else {
            passthrough.push(arg.clone());
            continue;
        };

        let (name, inline_value) = match option.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (option, None),
        };

        if VALUED.contains(&name) {
            match inline_value {
                Some(value) => wrapper.push(format!("--{}={}", name, value)),
                None => {
                    wrapper.push(format!("--{}", name));
                    wrapper.extend(iter.next().cloned());
                }
            }
        } else if FLAGS.contains(&name) && inline_value.is_none() {
            wrapper.push(format!("--{}", name));
        } else {
            passthrough.push(arg.clone());
        }
    }

    (wrapper, passthrough)
}
