//! core::paths
//!
//! Path handling for batch runs: the `--` path-list delimiter and grouping
//! input files into per-directory buckets ordered by nesting depth.
//!
//! # Why Depth Order
//!
//! Ruff resolves configuration per directory, with inner directories
//! inheriting from or overriding outer ones. Buckets are therefore
//! processed deepest first, and each bucket re-discovers its sentinels from
//! its own directory.
//!
//! # Normalization
//!
//! Absolute and relative forms are computed lexically (`.` and `..` are
//! folded without touching the filesystem and symlinks are not resolved),
//! so a path outside the invocation root yields a relative directory such
//! as `../other`.
//!
//! # Example
//!
//! ```
//! use ruffwrap::core::paths::FileBuckets;
//! use std::path::Path;
//!
//! let root = Path::new("/nonexistent/repo");
//! let buckets = FileBuckets::group(&["a/x.py", "a/b/y.py", "z.py"], root);
//!
//! let dirs: Vec<String> = buckets
//!     .iter_deepest_first()
//!     .map(|b| b.dir.display().to_string())
//!     .collect();
//! assert_eq!(dirs, vec!["a/b", ".", "a"]);
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

/// Literal token that starts an explicit path list.
pub const PATH_LIST_DELIMITER: &str = "--";

/// Errors from path-list handling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathListError {
    /// Tokens were found before the `--` delimiter.
    #[error("unexpected arguments before '--': {0:?}")]
    TokensBeforeDelimiter(Vec<String>),
}

/// Extract the path list from batch passthrough arguments.
///
/// Without a `--` token every argument is a path. With one, everything after
/// it is a path and anything before it is an error; this catches misspelled
/// options that would otherwise be taken as file names.
///
/// # Example
///
/// ```
/// use ruffwrap::core::paths::path_list;
///
/// let args: Vec<String> = vec!["--".into(), "a.py".into()];
/// assert_eq!(path_list(&args).unwrap(), ["a.py"]);
///
/// let args: Vec<String> = vec!["foo".into(), "--".into(), "a.py".into()];
/// assert!(path_list(&args).is_err());
/// ```
pub fn path_list(args: &[String]) -> Result<&[String], PathListError> {
    match args.iter().position(|a| a == PATH_LIST_DELIMITER) {
        None => Ok(args),
        Some(0) => Ok(&args[1..]),
        Some(i) => Err(PathListError::TokensBeforeDelimiter(args[..i].to_vec())),
    }
}

/// Lexically normalize a path, folding `.` and `..` components.
///
/// `..` at the root is dropped; leading `..` in a relative path is kept.
/// An empty result becomes `.`.
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

/// Make `path` absolute against `cwd` and normalize it.
pub fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&cwd.join(path))
    }
}

/// Express absolute `path` relative to absolute `base`, lexically.
///
/// Returns `.` when the two are equal.
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path = normalize(path);
    let base = normalize(base);
    let path_parts: Vec<Component<'_>> = path.components().collect();
    let base_parts: Vec<Component<'_>> = base.components().collect();

    let common = path_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in common..base_parts.len() {
        rel.push("..");
    }
    for part in &path_parts[common..] {
        rel.push(part.as_os_str());
    }
    if rel.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        rel
    }
}

/// Nesting depth of a relative directory: separators between components.
///
/// `.` and `a` are depth 0, `a/b` is depth 1.
pub fn depth_of(rel_dir: &Path) -> usize {
    rel_dir.components().count().saturating_sub(1)
}

/// Input files grouped by depth, then by containing directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileBuckets {
    root: PathBuf,
    by_depth: BTreeMap<usize, BTreeMap<PathBuf, BTreeSet<PathBuf>>>,
}

/// One directory's worth of input files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket<'a> {
    /// Depth of `dir` below the invocation root.
    pub depth: usize,
    /// Directory relative to the invocation root (`.` for the root itself).
    pub dir: &'a Path,
    /// Absolute paths of the files directly inside `dir`.
    pub files: &'a BTreeSet<PathBuf>,
    root: &'a Path,
}

impl Bucket<'_> {
    /// Absolute path of the bucket's directory.
    pub fn abs_dir(&self) -> PathBuf {
        absolutize(self.dir, self.root)
    }
}

impl FileBuckets {
    /// Group `paths` (absolute, or relative to `root`) into buckets.
    ///
    /// Paths that currently name a directory are skipped. Paths that do not
    /// exist are treated as files; the tool decides what to do with them.
    pub fn group<P: AsRef<Path>>(paths: &[P], root: &Path) -> Self {
        let mut by_depth: BTreeMap<usize, BTreeMap<PathBuf, BTreeSet<PathBuf>>> =
            BTreeMap::new();

        for path in paths {
            let abs = absolutize(path.as_ref(), root);
            if abs.is_dir() {
                continue;
            }
            let parent = abs.parent().map(Path::to_path_buf).unwrap_or_else(|| abs.clone());
            let rel_dir = relative_to(&parent, root);
            by_depth
                .entry(depth_of(&rel_dir))
                .or_default()
                .entry(rel_dir)
                .or_default()
                .insert(abs);
        }

        Self {
            root: root.to_path_buf(),
            by_depth,
        }
    }

    /// Iterate buckets from the deepest depth to the shallowest.
    ///
    /// Buckets at the same depth come in ascending directory order.
    pub fn iter_deepest_first(&self) -> impl Iterator<Item = Bucket<'_>> {
        self.by_depth.iter().rev().flat_map(move |(depth, dirs)| {
            dirs.iter().map(move |(dir, files)| Bucket {
                depth: *depth,
                dir,
                files,
                root: &self.root,
            })
        })
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.by_depth.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_depth.is_empty()
    }

    /// The invocation root the buckets are relative to.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    mod path_list {
        use super::*;

        #[test]
        fn no_delimiter_means_all_paths() {
            let args = strings(&["a.py", "b/c.py"]);
            assert_eq!(path_list(&args).unwrap(), args.as_slice());
        }

        #[test]
        fn leading_delimiter_is_stripped() {
            let args = strings(&["--", "a.py"]);
            assert_eq!(path_list(&args).unwrap(), strings(&["a.py"]).as_slice());
        }

        #[test]
        fn tokens_before_delimiter_are_rejected() {
            let args = strings(&["foo", "--", "a.py"]);
            assert_eq!(
                path_list(&args),
                Err(PathListError::TokensBeforeDelimiter(strings(&["foo"])))
            );
        }

        #[test]
        fn later_delimiters_are_paths() {
            let args = strings(&["--", "a.py", "--"]);
            assert_eq!(path_list(&args).unwrap(), strings(&["a.py", "--"]).as_slice());
        }

        #[test]
        fn empty() {
            let args: Vec<String> = Vec::new();
            assert!(path_list(&args).unwrap().is_empty());
        }
    }

    mod normalize {
        use super::*;

        #[test]
        fn folds_dots() {
            assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
            assert_eq!(normalize(Path::new("a/..")), PathBuf::from("."));
            assert_eq!(normalize(Path::new("../a")), PathBuf::from("../a"));
            assert_eq!(normalize(Path::new("/..")), PathBuf::from("/"));
        }

        #[test]
        fn relative_paths() {
            let root = Path::new("/repo");
            assert_eq!(relative_to(Path::new("/repo"), root), PathBuf::from("."));
            assert_eq!(relative_to(Path::new("/repo/a/b"), root), PathBuf::from("a/b"));
            assert_eq!(relative_to(Path::new("/other/x"), root), PathBuf::from("../other/x"));
        }

        #[test]
        fn depths() {
            assert_eq!(depth_of(Path::new(".")), 0);
            assert_eq!(depth_of(Path::new("a")), 0);
            assert_eq!(depth_of(Path::new("a/b")), 1);
            assert_eq!(depth_of(Path::new("a/b/c")), 2);
            assert_eq!(depth_of(Path::new("../x")), 1);
        }
    }

    mod buckets {
        use super::*;

        #[test]
        fn deepest_directories_first() {
            let root = Path::new("/nonexistent/ruffwrap-root");
            let buckets =
                FileBuckets::group(&["a/x.py", "a/b/y.py", "a/b/c/z.py", "a/b/w.py"], root);

            let dirs: Vec<PathBuf> = buckets
                .iter_deepest_first()
                .map(|b| b.dir.to_path_buf())
                .collect();
            assert_eq!(
                dirs,
                vec![
                    PathBuf::from("a/b/c"),
                    PathBuf::from("a/b"),
                    PathBuf::from("a")
                ]
            );
            assert_eq!(buckets.len(), 3);
        }

        #[test]
        fn files_are_absolute_and_grouped_by_parent() {
            let root = Path::new("/nonexistent/ruffwrap-root");
            let buckets = FileBuckets::group(&["a/b/y.py", "./a/b/w.py", "/abs/q.py"], root);

            let ab = buckets
                .iter_deepest_first()
                .find(|b| b.dir == Path::new("a/b"))
                .unwrap();
            let files: Vec<&PathBuf> = ab.files.iter().collect();
            assert_eq!(
                files,
                vec![
                    &PathBuf::from("/nonexistent/ruffwrap-root/a/b/w.py"),
                    &PathBuf::from("/nonexistent/ruffwrap-root/a/b/y.py"),
                ]
            );
            assert_eq!(ab.abs_dir(), PathBuf::from("/nonexistent/ruffwrap-root/a/b"));

            let outside = buckets
                .iter_deepest_first()
                .find(|b| b.dir == Path::new("../../abs"))
                .unwrap();
            assert_eq!(outside.abs_dir(), PathBuf::from("/abs"));
        }

        #[test]
        fn duplicate_inputs_collapse() {
            let root = Path::new("/nonexistent/ruffwrap-root");
            let buckets = FileBuckets::group(&["x.py", "./x.py"], root);
            let bucket = buckets.iter_deepest_first().next().unwrap();
            assert_eq!(bucket.dir, Path::new("."));
            assert_eq!(bucket.files.len(), 1);
        }

        #[test]
        fn directories_are_skipped() {
            let tmp = tempfile::tempdir().unwrap();
            std::fs::create_dir_all(tmp.path().join("pkg/sub")).unwrap();
            std::fs::write(tmp.path().join("pkg/mod.py"), "").unwrap();

            let buckets = FileBuckets::group(&["pkg", "pkg/sub", "pkg/mod.py"], tmp.path());
            let all: Vec<(PathBuf, usize)> = buckets
                .iter_deepest_first()
                .map(|b| (b.dir.to_path_buf(), b.files.len()))
                .collect();
            assert_eq!(all, vec![(PathBuf::from("pkg"), 1)]);
        }

        #[test]
        fn empty_input() {
            let buckets = FileBuckets::group::<&str>(&[], Path::new("/r"));
            assert!(buckets.is_empty());
            assert_eq!(buckets.iter_deepest_first().count(), 0);
            assert_eq!(buckets.root(), Path::new("/r"));
        }
    }
}
