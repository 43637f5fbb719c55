//! core
//!
//! Core domain types and pure logic for ruffwrap. Nothing in this module
//! spawns processes.
//!
//! # Modules
//!
//! - [`types`] - Strong types: ModeName, RunResult, exit codes
//! - [`config`] - Environment settings
//! - [`sentinel`] - Sentinel grammar and settings-dump parser
//! - [`modes`] - Command sequences, standard definitions, mode registry
//! - [`paths`] - Path-list delimiter and depth-ordered file buckets
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Per-directory state is a value, rebuilt for every directory
//! - All parsing is deterministic

pub mod config;
pub mod modes;
pub mod paths;
pub mod sentinel;
pub mod types;
