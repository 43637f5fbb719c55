//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Opens a [`Session`](crate::engine::Session) over the real tool runner
//! 2. Calls the engine to execute the run
//! 3. Reports engine outcomes and returns the process exit code
//!
//! Only failures that abort the whole run come back as `Err`; `main`
//! prints those as `error: <msg>` and exits with code 1.

mod batch;
mod single;

pub use batch::batch;
pub use single::single;

use crate::cli::args::Cli;
use crate::engine::Context;
use anyhow::Result;

/// Dispatch to the batch or single-invocation handler.
///
/// `--mode` selects batch; its absence selects single.
pub fn dispatch(cli: &Cli, ctx: &Context) -> Result<i32> {
    match cli.mode.as_deref() {
        Some(mode) => batch::batch(ctx, mode, cli.mode_require, &cli.passthrough),
        None => single::single(ctx, &cli.passthrough),
    }
}
