//! engine::discover
//!
//! Per-directory discovery: the settings probe that yields sentinels, and
//! the listing of files the tool considers in scope.
//!
//! # Settings Probe
//!
//! The probe runs `ruff check --show-settings` inside the directory with
//! configuration overrides that make it include every entry of that one
//! directory (and nothing below it), bypassing the cache. That resolves the
//! directory's effective configuration without side effects on unrelated
//! files.
//!
//! A directory with nothing for Ruff to look at makes the probe fail with a
//! "no files" message; that means "no sentinels", not an error. Any other
//! probe failure, including a probe that cannot be started at all, is fatal
//! for the whole run.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use super::resolve::ResolveError;
use super::Session;
use crate::core::sentinel::{parse_settings, DirectoryScope};
use crate::core::types::{EXIT_FATAL, EXIT_TOOL_NOT_FOUND};
use crate::tool::{Runner, ToolError};
use crate::ui::output::Verbosity;

/// Arguments of the settings probe.
pub const PROBE_ARGS: &[&str] = &[
    "check",
    "--show-settings",
    "--config",
    "include = [ '*', '.*' ]",
    "--config",
    "exclude = [ '*/*' ]",
    "--config",
    "cache-dir = '/dev/null'",
    "--no-cache",
];

/// Arguments of the in-scope file listing.
pub const SHOW_FILES_ARGS: &[&str] = &["check", "--show-files"];

/// Marker in the tool's stderr when a directory has nothing to check.
pub const NO_FILES_MARKER: &str = "No files found under the given path";

/// Errors from discovery.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// No usable executable.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The executable could not be started.
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// The settings probe could not be started.
    #[error("settings probe could not run in {}: {source}", dir.display())]
    ProbeSpawn {
        dir: PathBuf,
        #[source]
        source: ToolError,
    },

    /// The settings probe exited non-zero for a reason other than "no files".
    #[error("settings probe failed in {} (exit code {code}):\n{stderr}", dir.display())]
    ProbeFailed {
        dir: PathBuf,
        code: i32,
        stderr: String,
    },

    /// The in-scope file listing exited non-zero.
    #[error("file listing failed in {} (exit code {code}):\n{stderr}", dir.display())]
    ListingFailed {
        dir: PathBuf,
        code: i32,
        stderr: String,
    },
}

impl DiscoveryError {
    /// Whether this error aborts the whole run rather than one directory.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DiscoveryError::ProbeFailed { .. } | DiscoveryError::ProbeSpawn { .. }
        )
    }

    /// Exit code to record for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            DiscoveryError::Resolve(_) | DiscoveryError::Tool(_) => EXIT_TOOL_NOT_FOUND,
            DiscoveryError::ProbeFailed { .. } | DiscoveryError::ProbeSpawn { .. } => EXIT_FATAL,
            DiscoveryError::ListingFailed { code, .. } => (*code).max(1),
        }
    }
}

fn owned(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

impl<R: Runner> Session<'_, R> {
    /// Probe `dir`'s settings and collect its sentinels into a fresh scope.
    pub fn discover(&self, dir: &Path) -> Result<DirectoryScope, DiscoveryError> {
        let argv = self.command_line(&DirectoryScope::empty(), &owned(PROBE_ARGS))?;
        self.echo(dir, &argv, Verbosity::PROBES);
        let output = self
            .runner()
            .capture(dir, &argv)
            .map_err(|source| DiscoveryError::ProbeSpawn {
                dir: dir.to_path_buf(),
                source,
            })?;

        if !output.success() {
            if output.stderr.contains(NO_FILES_MARKER) {
                debug!(dir = %dir.display(), "no files in scope; no sentinels");
                return Ok(DirectoryScope::empty());
            }
            return Err(DiscoveryError::ProbeFailed {
                dir: dir.to_path_buf(),
                code: output.code,
                stderr: output.stderr,
            });
        }

        let scope = parse_settings(self.grammar(), &output.stdout);
        for rejected in &scope.rejected {
            warn!(dir = %dir.display(), "ignoring sentinel: {}", rejected);
        }
        debug!(
            dir = %dir.display(),
            exec_override = ?scope.exec_override,
            modes = ?scope.modes.names().map(|m| m.as_str()).collect::<Vec<_>>(),
            "discovered sentinels"
        );
        Ok(scope)
    }

    /// Ask the tool which of `candidates` it considers in scope in `dir`.
    ///
    /// Returns file names (relative to `dir`) of the intersection, in
    /// ascending order.
    pub fn in_scope_files(
        &self,
        dir: &Path,
        scope: &DirectoryScope,
        candidates: &BTreeSet<PathBuf>,
    ) -> Result<Vec<String>, DiscoveryError> {
        let argv = self.command_line(scope, &owned(SHOW_FILES_ARGS))?;
        self.echo(dir, &argv, Verbosity::PROBES);
        let output = self.runner().capture(dir, &argv)?;

        if !output.success() {
            if output.stderr.contains(NO_FILES_MARKER) {
                return Ok(Vec::new());
            }
            return Err(DiscoveryError::ListingFailed {
                dir: dir.to_path_buf(),
                code: output.code,
                stderr: output.stderr,
            });
        }

        let reported: HashSet<PathBuf> = output
            .stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(PathBuf::from)
            .collect();

        Ok(candidates
            .iter()
            .filter(|path| reported.contains(*path))
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Settings;
    use crate::engine::Context;
    use crate::tool::mock::{self, InvocationKind, MockRunner};

    fn context() -> Context {
        Context {
            root: PathBuf::from("/repo"),
            settings: Settings {
                default_exec: Some("ruff".into()),
                ..Settings::default()
            },
            ..Context::default()
        }
    }

    fn is_probe(argv: &[String]) -> bool {
        argv.iter().any(|a| a == "--show-settings")
    }

    mod discover {
        use super::*;

        #[test]
        fn probe_runs_in_directory_with_isolating_config() {
            let ctx = context();
            let runner = MockRunner::new(|_, _| {
                Ok(mock::ok("linter.builtins = [\n\t__RUFFWRAP_EXEC__/pinned/ruff,\n]\n"))
            });
            let session = Session::new(&ctx, &runner).unwrap();

            let scope = session.discover(Path::new("/repo/pkg")).unwrap();
            assert_eq!(scope.exec_override.as_deref(), Some("/pinned/ruff"));

            let calls = runner.invocations();
            assert_eq!(calls.len(), 1);
            assert_eq!(calls[0].kind, InvocationKind::Capture);
            assert_eq!(calls[0].dir, PathBuf::from("/repo/pkg"));
            assert_eq!(calls[0].argv[0], "ruff");
            assert_eq!(&calls[0].argv[1..], owned(PROBE_ARGS).as_slice());
        }

        #[test]
        fn no_files_means_no_sentinels() {
            let ctx = context();
            let runner = MockRunner::new(|_, _| {
                Ok(mock::failed(
                    2,
                    "warning: No files found under the given path(s)\n",
                ))
            });
            let session = Session::new(&ctx, &runner).unwrap();
            assert_eq!(
                session.discover(Path::new("/repo")).unwrap(),
                DirectoryScope::empty()
            );
        }

        #[test]
        fn other_probe_failures_are_fatal() {
            let ctx = context();
            let runner = MockRunner::new(|_, _| Ok(mock::failed(2, "ruff failed: bad toml\n")));
            let session = Session::new(&ctx, &runner).unwrap();

            let err = session.discover(Path::new("/repo")).unwrap_err();
            assert!(err.is_fatal());
            assert_eq!(err.exit_code(), EXIT_FATAL);
            assert!(err.to_string().contains("bad toml"));
        }

        #[test]
        fn probe_that_cannot_start_is_fatal() {
            let ctx = context();
            let runner = MockRunner::new(|_, _| Err(mock::not_found("ruff")));
            let session = Session::new(&ctx, &runner).unwrap();

            let err = session.discover(Path::new("/repo/pkg")).unwrap_err();
            assert!(matches!(err, DiscoveryError::ProbeSpawn { .. }));
            assert!(err.is_fatal());
            assert_eq!(err.exit_code(), EXIT_FATAL);
            assert!(err.to_string().contains("/repo/pkg"));
        }

        #[test]
        fn unresolvable_executable_is_directory_local() {
            let ctx = Context {
                settings: Settings::default(),
                ..context()
            };
            let runner = MockRunner::succeeding();
            let session = Session::new(&ctx, &runner)
                .unwrap()
                .with_lookup(|_| None);

            let err = session.discover(Path::new("/repo")).unwrap_err();
            assert!(matches!(err, DiscoveryError::Resolve(ResolveError::NotFound)));
            assert!(runner.invocations().is_empty());
        }

        #[test]
        fn probe_ignores_previous_directory_override() {
            let ctx = context();
            let runner = MockRunner::new(|dir, _| {
                if dir == Path::new("/repo/inner") {
                    Ok(mock::ok("linter.builtins = [\n\t__RUFFWRAP_EXEC__/pinned/ruff,\n]\n"))
                } else {
                    Ok(mock::ok("linter.builtins = []\n"))
                }
            });
            let session = Session::new(&ctx, &runner).unwrap();

            let inner = session.discover(Path::new("/repo/inner")).unwrap();
            let outer = session.discover(Path::new("/repo")).unwrap();
            assert_eq!(inner.exec_override.as_deref(), Some("/pinned/ruff"));
            assert_eq!(outer.exec_override, None);

            let calls = runner.invocations();
            assert!(calls.iter().all(|c| is_probe(&c.argv) && c.argv[0] == "ruff"));
        }
    }

    mod in_scope_files {
        use super::*;

        fn candidates(paths: &[&str]) -> BTreeSet<PathBuf> {
            paths.iter().map(PathBuf::from).collect()
        }

        #[test]
        fn intersects_with_reported_files() {
            let ctx = context();
            let runner = MockRunner::new(|_, _| {
                Ok(mock::ok(
                    "/repo/pkg/b.py\n/repo/pkg/a.py\n/repo/pkg/sub/c.py\n/repo/pkg/other.py\n",
                ))
            });
            let session = Session::new(&ctx, &runner).unwrap();

            let files = session
                .in_scope_files(
                    Path::new("/repo/pkg"),
                    &DirectoryScope::empty(),
                    &candidates(&["/repo/pkg/a.py", "/repo/pkg/b.py", "/repo/pkg/excluded.py"]),
                )
                .unwrap();
            assert_eq!(files, vec!["a.py", "b.py"]);
        }

        #[test]
        fn uses_scope_override() {
            let ctx = context();
            let runner = MockRunner::succeeding();
            let session = Session::new(&ctx, &runner).unwrap();
            let scope = DirectoryScope {
                exec_override: Some("uvx ruff@0.6.9".into()),
                ..DirectoryScope::empty()
            };

            session
                .in_scope_files(Path::new("/repo"), &scope, &candidates(&["/repo/a.py"]))
                .unwrap();
            assert_eq!(
                runner.invocations()[0].line(),
                "uvx ruff@0.6.9 check --show-files"
            );
        }

        #[test]
        fn no_files_is_empty() {
            let ctx = context();
            let runner =
                MockRunner::new(|_, _| Ok(mock::failed(1, "No files found under the given path")));
            let session = Session::new(&ctx, &runner).unwrap();
            let files = session
                .in_scope_files(Path::new("/repo"), &DirectoryScope::empty(), &candidates(&["/repo/a.py"]))
                .unwrap();
            assert!(files.is_empty());
        }

        #[test]
        fn listing_that_cannot_start_is_directory_local() {
            let ctx = context();
            let runner = MockRunner::new(|_, _| Err(mock::not_found("ruff")));
            let session = Session::new(&ctx, &runner).unwrap();
            let err = session
                .in_scope_files(Path::new("/repo"), &DirectoryScope::empty(), &candidates(&["/repo/a.py"]))
                .unwrap_err();
            assert!(matches!(err, DiscoveryError::Tool(_)));
            assert!(!err.is_fatal());
            assert_eq!(err.exit_code(), EXIT_TOOL_NOT_FOUND);
        }

        #[test]
        fn listing_failure_carries_code() {
            let ctx = context();
            let runner = MockRunner::new(|_, _| Ok(mock::failed(2, "boom")));
            let session = Session::new(&ctx, &runner).unwrap();
            let err = session
                .in_scope_files(Path::new("/repo"), &DirectoryScope::empty(), &candidates(&["/repo/a.py"]))
                .unwrap_err();
            assert!(!err.is_fatal());
            assert_eq!(err.exit_code(), 2);
        }
    }
}
