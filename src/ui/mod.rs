//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Command echo and diagnostics on stderr
//!
//! # Design
//!
//! Everything the wrapper itself prints goes to stderr, so that stdout
//! carries only the wrapped tool's own output and stays safe to pipe.

pub mod output;
