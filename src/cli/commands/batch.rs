//! batch command - Run a named mode over files, bucket by bucket

use crate::engine::{run_batch, BatchError, BatchRequest, Context, Session};
use crate::tool::ProcessRunner;
use crate::ui::output;
use anyhow::{Context as _, Result};

/// Run `mode` over the files in `args`.
pub fn batch(ctx: &Context, mode: &str, mode_require: bool, args: &[String]) -> Result<i32> {
    let runner = ProcessRunner;
    let session = Session::new(ctx, &runner).context("Failed to build sentinel grammar")?;

    let request = BatchRequest {
        mode,
        mode_require,
        args,
    };
    match run_batch(&session, &request) {
        Ok(result) => Ok(result.code()),
        Err(e @ BatchError::BadArgs { .. }) => {
            output::report(&e);
            Ok(e.exit_code())
        }
        Err(BatchError::Discovery(e)) => Err(e.into()),
    }
}
