//! engine
//!
//! Orchestrates invocations of the wrapped tool.
//!
//! # Architecture
//!
//! Every run follows the same per-directory lifecycle:
//!
//! ```text
//! Discover (settings probe -> sentinels) -> Resolve executable -> Invoke
//! ```
//!
//! - [`single`] runs the lifecycle once, in the invocation root, and hands
//!   the process over to the tool with the passthrough arguments.
//! - [`batch`] runs it once per directory bucket, deepest first, filtering
//!   each bucket to the files the tool considers in scope and running the
//!   requested mode's command sequence over them.
//!
//! # Invariants
//!
//! - Discovered state is a [`DirectoryScope`] value built fresh per
//!   directory; nothing discovered in one directory is visible in another
//! - Children run in their bucket's directory; the process working
//!   directory never changes
//! - Buckets are processed strictly one after another
//!
//! # Example
//!
//! ```ignore
//! use ruffwrap::engine::{batch, Context, Session};
//! use ruffwrap::tool::ProcessRunner;
//!
//! let session = Session::new(&ctx, &ProcessRunner)?;
//! let result = batch::run_batch(&session, &request)?;
//! std::process::exit(result.code());
//! ```

pub mod batch;
pub mod discover;
pub mod resolve;
pub mod single;

pub use batch::{run_batch, BatchError, BatchRequest};
pub use discover::DiscoveryError;
pub use resolve::{resolve_prefix, which_lookup, Lookup, ResolveError};
pub use single::run_single;

use std::path::{Path, PathBuf};

use crate::core::config::Settings;
use crate::core::paths::relative_to;
use crate::core::sentinel::{DirectoryScope, SentinelGrammar, DEFAULT_NAMESPACE};
use crate::tool::Runner;
use crate::ui::output::{self, Verbosity};

/// Execution context for a run.
///
/// Contains process-wide settings fixed at startup.
#[derive(Debug, Clone)]
pub struct Context {
    /// Invocation root: the working directory ruffwrap was started in.
    pub root: PathBuf,
    /// Command echo verbosity.
    pub verbosity: Verbosity,
    /// Environment settings.
    pub settings: Settings,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            verbosity: Verbosity::default(),
            settings: Settings::default(),
        }
    }
}

/// A run in progress: context, tool runner, and sentinel grammar.
pub struct Session<'a, R: Runner> {
    ctx: &'a Context,
    runner: &'a R,
    grammar: SentinelGrammar,
    lookup: Lookup,
}

impl<'a, R: Runner> Session<'a, R> {
    /// Create a session using the `RUFFWRAP` sentinel namespace and `PATH`
    /// lookup.
    pub fn new(ctx: &'a Context, runner: &'a R) -> Result<Self, regex::Error> {
        Ok(Self {
            ctx,
            runner,
            grammar: SentinelGrammar::new(DEFAULT_NAMESPACE)?,
            lookup: which_lookup,
        })
    }

    /// Replace the executable lookup used when nothing is configured.
    pub fn with_lookup(mut self, lookup: Lookup) -> Self {
        self.lookup = lookup;
        self
    }

    /// Replace the sentinel grammar.
    pub fn with_grammar(mut self, grammar: SentinelGrammar) -> Self {
        self.grammar = grammar;
        self
    }

    pub fn context(&self) -> &Context {
        self.ctx
    }

    pub fn runner(&self) -> &R {
        self.runner
    }

    pub fn grammar(&self) -> &SentinelGrammar {
        &self.grammar
    }

    /// Build a full command line: resolved executable prefix, then `args`.
    pub fn command_line(
        &self,
        scope: &DirectoryScope,
        args: &[String],
    ) -> Result<Vec<String>, ResolveError> {
        let mut argv = resolve_prefix(
            &self.ctx.settings,
            scope.exec_override.as_deref(),
            self.lookup,
        )?;
        argv.extend(args.iter().cloned());
        Ok(argv)
    }

    /// `dir` relative to the invocation root, for display.
    pub fn display_dir(&self, dir: &Path) -> String {
        relative_to(dir, &self.ctx.root).display().to_string()
    }

    /// Echo a command line run in `dir`, subject to verbosity.
    pub fn echo(&self, dir: &Path, argv: &[String], threshold: Verbosity) {
        output::command(&self.display_dir(dir), argv, self.ctx.verbosity, threshold);
    }
}
