//! single command - Run Ruff once with the passthrough arguments

use crate::engine::{run_single, Context, Session};
use crate::tool::ProcessRunner;
use anyhow::{Context as _, Result};

/// Hand the process over to Ruff with `args`.
///
/// On Unix this only returns when Ruff could not be started.
pub fn single(ctx: &Context, args: &[String]) -> Result<i32> {
    let runner = ProcessRunner;
    let session = Session::new(ctx, &runner).context("Failed to build sentinel grammar")?;
    Ok(run_single(&session, args)?)
}
