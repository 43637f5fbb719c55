//! ruffwrap - A sentinel-driven wrapper for the Ruff linter/formatter
//!
//! ruffwrap lets a project pin the Ruff executable it is checked with, and
//! define multi-step "modes" (pre-commit hook, CI verification, legacy
//! enrollment), all from inside Ruff's own configuration. The settings live
//! as sentinel entries in `lint.builtins`, so they inherit per directory
//! exactly like the rest of Ruff's configuration.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - Per-directory Discover → Resolve → Invoke lifecycle, in
//!   single and batch form
//! - [`core`] - Domain types, sentinel parsing, mode registry, path grouping
//! - [`tool`] - Single interface for all child-process invocations
//! - [`ui`] - Command echo and diagnostics
//!
//! # Correctness Invariants
//!
//! ruffwrap maintains the following invariants:
//!
//! 1. Discovered state never leaks from one directory to another
//! 2. Directories are processed deepest first, one at a time
//! 3. The exit code is never lower than any failure observed
//! 4. Nothing but `--version` and `--help` is written to stdout by ruffwrap
//!    itself

pub mod cli;
pub mod core;
pub mod engine;
pub mod tool;
pub mod ui;
