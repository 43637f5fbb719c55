//! tool
//!
//! Single interface for invoking the wrapped tool.
//!
//! # Architecture
//!
//! This module is the **only doorway** to child processes. The engine never
//! touches `std::process` directly; it goes through the [`Runner`] trait so
//! that orchestration can be tested against the scripted `MockRunner`.
//!
//! # Invariants
//!
//! - Every invocation names its working directory explicitly; the process
//!   working directory is never changed
//! - Invocations are blocking; a child runs to completion before the next
//!   one starts
//! - Exit codes are normalized to `i32` (`128 + signal` for signal deaths)

mod interface;

#[cfg(test)]
pub mod mock;

pub use interface::{exit_code, ProcessRunner, Runner, ToolError, ToolOutput};
