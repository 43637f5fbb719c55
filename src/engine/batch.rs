//! engine::batch
//!
//! Batch orchestrator: run a named mode's command sequence over groups of
//! files, one directory bucket at a time.
//!
//! # Lifecycle
//!
//! For each bucket, deepest first:
//!
//! ```text
//! discover -> mode defined? -> filter in-scope files -> run sequence
//! ```
//!
//! - An undefined mode skips the bucket, or records `1` under
//!   `--mode-require`
//! - An empty in-scope set skips the bucket
//! - The first failing step ends the bucket's sequence; the next bucket
//!   still runs
//!
//! The run's exit code is the maximum code recorded across buckets.
//!
//! # Example
//!
//! ```ignore
//! let request = BatchRequest { mode: "hook", mode_require: true, args: &args };
//! let result = run_batch(&session, &request)?;
//! ```

use thiserror::Error;
use tracing::{debug, info};

use super::discover::DiscoveryError;
use super::Session;
use crate::core::paths::{path_list, Bucket, FileBuckets, PathListError};
use crate::core::types::{RunResult, EXIT_BAD_ARGS, EXIT_MODE_UNDEFINED, EXIT_SUCCESS};
use crate::tool::Runner;
use crate::ui::output::{self, Verbosity};

/// A batch run request.
#[derive(Debug, Clone, Copy)]
pub struct BatchRequest<'a> {
    /// Mode whose command sequence runs in each bucket.
    pub mode: &'a str,
    /// Fail buckets where the mode is not defined.
    pub mode_require: bool,
    /// Passthrough arguments (the path list, optionally after `--`).
    pub args: &'a [String],
}

/// Errors that end a batch run early.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Tokens before the `--` delimiter.
    #[error("bad {mode} mode args, failing (exit code 3): {tokens:?}")]
    BadArgs { mode: String, tokens: Vec<String> },

    /// A discovery failure that aborts the whole run.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}

impl BatchError {
    /// Exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            BatchError::BadArgs { .. } => EXIT_BAD_ARGS,
            BatchError::Discovery(e) => e.exit_code(),
        }
    }
}

/// Run a batch request.
///
/// With the skip flag set nothing is validated or invoked and the result is
/// success.
pub fn run_batch<R: Runner>(
    session: &Session<'_, R>,
    request: &BatchRequest<'_>,
) -> Result<RunResult, BatchError> {
    let ctx = session.context();
    if ctx.settings.skip {
        info!("skip flag set; nothing to do");
        return Ok(RunResult::success());
    }

    let paths = path_list(request.args).map_err(|e| match e {
        PathListError::TokensBeforeDelimiter(tokens) => BatchError::BadArgs {
            mode: request.mode.to_string(),
            tokens,
        },
    })?;

    let buckets = FileBuckets::group(paths, &ctx.root);
    debug!(buckets = buckets.len(), mode = request.mode, "batch run");

    let mut result = RunResult::success();
    for bucket in buckets.iter_deepest_first() {
        let code = run_bucket(session, request, &bucket)?;
        result.record(code);
    }
    Ok(result)
}

fn run_bucket<R: Runner>(
    session: &Session<'_, R>,
    request: &BatchRequest<'_>,
    bucket: &Bucket<'_>,
) -> Result<i32, BatchError> {
    let dir = bucket.abs_dir();

    let scope = match session.discover(&dir) {
        Ok(scope) => scope,
        Err(e) if e.is_fatal() => return Err(e.into()),
        Err(e) => return Ok(report_failure(&e)),
    };

    let Some(sequence) = scope.modes.get(request.mode) else {
        if request.mode_require {
            output::report(format!(
                "{}: mode \"{}\" undefined; mode-require set, failing (exit code {})",
                dir.display(),
                request.mode,
                EXIT_MODE_UNDEFINED
            ));
            return Ok(EXIT_MODE_UNDEFINED);
        }
        debug!(dir = %dir.display(), mode = request.mode, "mode undefined; skipping");
        return Ok(EXIT_SUCCESS);
    };

    let files = match session.in_scope_files(&dir, &scope, bucket.files) {
        Ok(files) => files,
        Err(e) => return Ok(report_failure(&e)),
    };
    if files.is_empty() {
        debug!(dir = %dir.display(), "no in-scope files; skipping");
        return Ok(EXIT_SUCCESS);
    }

    for (index, command) in sequence.iter() {
        let mut args = command.to_vec();
        args.extend(files.iter().cloned());

        let argv = match session.command_line(&scope, &args) {
            Ok(argv) => argv,
            Err(e) => return Ok(report_failure(&DiscoveryError::from(e))),
        };
        session.echo(&dir, &argv, Verbosity::COMMANDS);

        let code = match session.runner().status(&dir, &argv) {
            Ok(code) => code,
            Err(e) => return Ok(report_failure(&DiscoveryError::from(e))),
        };
        if code != 0 {
            debug!(dir = %dir.display(), index, code, "step failed");
            output::report(step_failure(&argv, code));
            return Ok(code);
        }
    }
    Ok(EXIT_SUCCESS)
}

fn report_failure(err: &DiscoveryError) -> i32 {
    output::error(err);
    err.exit_code()
}

fn step_failure(argv: &[String], code: i32) -> String {
    format!(
        "command {} returned non-zero exit status {}",
        shell_words::join(argv),
        code
    )
}
