//! engine::single
//!
//! Single-invocation runner: discover the invocation root's sentinels once,
//! then hand the process over to the tool with the passthrough arguments.
//!
//! On Unix the process image is replaced, so a successful run never returns
//! here and the tool's exit code is the wrapper's exit code. A failure to
//! start the tool, or to resolve it at all, is reported and yields `200`.
//! A settings probe that fails or cannot start is fatal, as in batch runs.

use tracing::debug;

use super::discover::DiscoveryError;
use super::Session;
use crate::core::sentinel::DirectoryScope;
use crate::core::types::EXIT_TOOL_NOT_FOUND;
use crate::tool::Runner;
use crate::ui::output::{self, Verbosity};

/// Run the tool once in the invocation root with `args`.
///
/// Returns the exit code to leave with. Only a fatal discovery failure is
/// returned as an error.
pub fn run_single<R: Runner>(
    session: &Session<'_, R>,
    args: &[String],
) -> Result<i32, DiscoveryError> {
    let ctx = session.context();
    let root = ctx.root.as_path();

    let scope = if ctx.settings.skip {
        debug!("skip flag set; sentinel discovery bypassed");
        DirectoryScope::empty()
    } else {
        match session.discover(root) {
            Ok(scope) => scope,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                output::error(&e);
                return Ok(EXIT_TOOL_NOT_FOUND);
            }
        }
    };

    let argv = match session.command_line(&scope, args) {
        Ok(argv) => argv,
        Err(e) => {
            output::error(&e);
            return Ok(EXIT_TOOL_NOT_FOUND);
        }
    };
    session.echo(root, &argv, Verbosity::COMMANDS);

    match session.runner().replace(root, &argv) {
        Ok(code) => Ok(code),
        Err(e) => {
            output::report(format!(
                "Error executing {}: {}",
                shell_words::join(&argv),
                e
            ));
            Ok(EXIT_TOOL_NOT_FOUND)
        }
    }
}
