//! cli
//!
//! Command-line interface layer for ruffwrap.
//!
//! # Responsibilities
//!
//! - Load environment settings and parse the command line
//! - Set up diagnostic logging
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to the
//! [`crate::engine`] for execution. Exit codes come back from the handlers;
//! nothing here decides them except for argument and startup failures.

pub mod args;
pub mod commands;

pub use args::{ArgsError, Cli};

use crate::core::config::Settings;
use crate::core::types::{EXIT_FATAL, EXIT_SUCCESS};
use crate::engine;
use crate::ui::output::{self, Verbosity};
use anyhow::{Context as _, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Run the CLI application and return the process exit code.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> i32 {
    let settings = Settings::from_env();

    let cli = match Cli::parse_args(&settings) {
        Ok(cli) => cli,
        Err(ArgsError::Parse(e)) => {
            // help goes to stdout with code 0, usage errors to stderr
            let _ = e.print();
            return e.exit_code();
        }
    };

    if cli.version {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return EXIT_SUCCESS;
    }

    init_logging(Verbosity(cli.verbose), settings.log_filter.as_deref());

    match execute(&cli, settings) {
        Ok(code) => code,
        Err(e) => {
            output::error(format!("{:#}", e));
            EXIT_FATAL
        }
    }
}

fn execute(cli: &Cli, settings: Settings) -> Result<i32> {
    let root = std::env::current_dir().context("Failed to determine the working directory")?;
    let ctx = engine::Context {
        root,
        verbosity: Verbosity(cli.verbose),
        settings,
    };
    commands::dispatch(cli, &ctx)
}

/// Default log filter for a verbosity level.
pub fn default_log_filter(verbosity: Verbosity) -> &'static str {
    match verbosity.0 {
        0 => "warn",
        1 | 2 => "info",
        _ => "debug",
    }
}

/// Install the stderr log subscriber.
///
/// `filter` (from `RUFFWRAP_LOG`) takes precedence over the verbosity
/// default. An invalid filter falls back to the default.
fn init_logging(verbosity: Verbosity, filter: Option<&str>) {
    let fallback = default_log_filter(verbosity);
    let filter = filter
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(fallback));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(false),
        )
        .try_init();
}
