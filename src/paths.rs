//! Path helpers shared by the resolver, the graph, and the formatter.
//!
//! Graph keys are plain strings holding absolute, lexically normalized
//! paths. Normalization never touches the filesystem, so symlinked
//! `node_modules` layouts keep the path they were reached through.

use path_clean::PathClean;
use std::path::{Path, PathBuf};

/// Lexically normalizes a path by dropping `.` segments and folding `..`
/// into the preceding segment.
///
/// # Example
///
/// ```rust
/// use std::path::Path;
/// use chainscope::paths::normalize;
///
/// assert_eq!(normalize(Path::new("/proj/src/../lib/./a.js")), Path::new("/proj/lib/a.js"));
/// ```
pub fn normalize(path: &Path) -> PathBuf {
    path.clean()
}

/// Makes `path` absolute against `cwd` and normalizes the result.
///
/// An absolute `path` replaces `cwd` entirely.
pub fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    cwd.join(path).clean()
}

/// Converts a path into the string form used as a graph key.
pub fn path_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Returns true if any separator-delimited segment is `node_modules`.
pub fn has_node_modules_segment(path: &str) -> bool {
    path.split(['/', '\\']).any(|segment| segment == "node_modules")
}

/// Returns true for paths written relative to the current location (`./x`, `../x`).
pub fn is_relative(path: &str) -> bool {
    path.starts_with('.')
}

/// Returns true for absolute paths, including Windows drive paths.
pub fn is_absolute(path: &str) -> bool {
    path.starts_with('/') || Path::new(path).is_absolute()
}

/// Final separator-delimited component of a path string.
pub fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
