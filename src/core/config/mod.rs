//! core::config
//!
//! Process-wide settings loaded from the environment.
//!
//! # Overview
//!
//! `ruffwrap` deliberately has no configuration file of its own: per-directory
//! configuration travels as sentinels inside Ruff's configuration. The only
//! process-wide knobs are environment variables:
//!
//! - `RUFFWRAP_EXEC` - default Ruff executable (may include arguments, e.g.
//!   `uvx ruff@0.6.9`). Used for the settings probe, and for every command
//!   when no exec sentinel overrides it.
//! - `RUFFWRAP_SKIP` - when non-empty, skip sentinel processing entirely.
//! - `RUFFWRAP_INVOKED_AS` - program name to use instead of `argv[0]` when
//!   deciding whether wrapper options need the `ruffwrap-` prefix.
//! - `RUFFWRAP_LOG` - `tracing` filter directive for diagnostic logs.
//!
//! Empty values are treated as unset.
//!
//! # Example
//!
//! ```
//! use ruffwrap::core::config::Settings;
//!
//! let settings = Settings::from_lookup(|key| match key {
//!     "RUFFWRAP_EXEC" => Some("uvx ruff@0.6.9".to_string()),
//!     "RUFFWRAP_SKIP" => Some(String::new()),
//!     _ => None,
//! });
//! assert_eq!(settings.default_exec.as_deref(), Some("uvx ruff@0.6.9"));
//! assert!(!settings.skip);
//! ```

/// Default executable variable.
pub const ENV_EXEC: &str = "RUFFWRAP_EXEC";

/// Skip-sentinels variable.
pub const ENV_SKIP: &str = "RUFFWRAP_SKIP";

/// Invocation-name override variable.
pub const ENV_INVOKED_AS: &str = "RUFFWRAP_INVOKED_AS";

/// Log filter variable.
pub const ENV_LOG: &str = "RUFFWRAP_LOG";

/// Settings from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Default executable (unsplit).
    pub default_exec: Option<String>,
    /// Skip sentinel processing.
    pub skip: bool,
    /// Program name override.
    pub invoked_as: Option<String>,
    /// Log filter directive.
    pub log_filter: Option<String>,
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());
        Self {
            default_exec: non_empty(ENV_EXEC),
            skip: non_empty(ENV_SKIP).is_some(),
            invoked_as: non_empty(ENV_INVOKED_AS),
            log_filter: non_empty(ENV_LOG),
        }
    }
}
