//! Module resolution for import specifiers.
//!
//! Turns a specifier written in a source file into the absolute path of
//! the file it refers to. Resolution is best effort and never fails: a
//! specifier that cannot be matched to a file on disk resolves to `None`.
//!
//! # Strategies
//!
//! - Relative and absolute specifiers (`./a`, `../b`, `/c`) are joined with
//!   the importer's directory and probed with [`RESOLVE_SUFFIXES`], then as
//!   a directory index.
//! - Bare specifiers (`react`, `@scope/pkg/sub`) are looked up in
//!   `node_modules` directories walking up from the importer, honoring the
//!   package's `exports` map and `main` field.
//! - `node:` builtins resolve to `None`.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use chainscope::resolver::ModuleResolver;
//!
//! let mut resolver = ModuleResolver::new();
//! let resolved = resolver.resolve("./util", Path::new("/proj/src/app.ts"));
//! println!("{:?}", resolved);
//! ```

pub mod exports;
mod package;
mod probe;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::paths::{is_absolute, is_relative, normalize};

pub use package::{resolve_bare, resolve_in_package, split_package_specifier};
pub use probe::{probe, RESOLVE_SUFFIXES};

/// How a specifier is looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecifierKind {
    /// `./x`, `../x`, `/x` or an OS-absolute path
    Path,
    /// A package name with an optional subpath
    Bare,
    /// A `node:` builtin
    Builtin,
}

impl SpecifierKind {
    /// Classifies a raw specifier.
    pub fn of(specifier: &str) -> Self {
        if specifier.starts_with("node:") {
            SpecifierKind::Builtin
        } else if is_relative(specifier) || is_absolute(specifier) {
            SpecifierKind::Path
        } else {
            SpecifierKind::Bare
        }
    }
}

/// Resolves specifiers to files, with an optional per-build memo.
///
/// The memo is keyed by the specifier and the importer's directory, since
/// every strategy starts from that directory. Call [`clear`] at the start
/// of each build so that files created between builds are seen.
///
/// [`clear`]: ModuleResolver::clear
#[derive(Debug, Clone, Default)]
pub struct ModuleResolver {
    memo: Option<HashMap<(String, PathBuf), Option<PathBuf>>>,
}

impl ModuleResolver {
    /// Creates a memoizing resolver.
    pub fn new() -> Self {
        Self::with_memo(true)
    }

    /// Creates a resolver that probes the filesystem on every call.
    pub fn without_memo() -> Self {
        Self::with_memo(false)
    }

    pub fn with_memo(enabled: bool) -> Self {
        Self {
            memo: enabled.then(HashMap::new),
        }
    }

    pub fn is_memoizing(&self) -> bool {
        self.memo.is_some()
    }

    /// Number of memoized lookups, hits and misses alike.
    pub fn memo_len(&self) -> usize {
        self.memo.as_ref().map_or(0, HashMap::len)
    }

    /// Forgets every memoized lookup.
    pub fn clear(&mut self) {
        if let Some(memo) = self.memo.as_mut() {
            memo.clear();
        }
    }

    /// Resolves `specifier` as written in `importer`.
    ///
    /// # Arguments
    ///
    /// * `specifier` - The raw specifier string from the source text
    /// * `importer` - Absolute path of the file containing the specifier
    ///
    /// # Returns
    ///
    /// The normalized absolute path of the resolved file, or `None`.
    pub fn resolve(&mut self, specifier: &str, importer: &Path) -> Option<PathBuf> {
        let importer_dir = importer.parent().unwrap_or(Path::new("/")).to_path_buf();

        let Some(memo) = self.memo.as_mut() else {
            return resolve_from_dir(specifier, &importer_dir);
        };

        let key = (specifier.to_string(), importer_dir);
        if let Some(cached) = memo.get(&key) {
            return cached.clone();
        }
        let resolved = resolve_from_dir(specifier, &key.1);
        memo.insert(key, resolved.clone());
        resolved
    }
}

/// Resolves `specifier` relative to `importer_dir` without any caching.
pub fn resolve_from_dir(specifier: &str, importer_dir: &Path) -> Option<PathBuf> {
    let resolved = match SpecifierKind::of(specifier) {
        SpecifierKind::Builtin => return None,
        SpecifierKind::Path => probe(&importer_dir.join(specifier)),
        SpecifierKind::Bare => resolve_bare(specifier, importer_dir),
    };

    if resolved.is_none() {
        debug!(specifier, from = %importer_dir.display(), "specifier did not resolve");
    }
    resolved.map(|path| normalize(&path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_specifier_kind() {
        assert_eq!(SpecifierKind::of("./a"), SpecifierKind::Path);
        assert_eq!(SpecifierKind::of("../a"), SpecifierKind::Path);
        assert_eq!(SpecifierKind::of("/abs/a"), SpecifierKind::Path);
        assert_eq!(SpecifierKind::of("react"), SpecifierKind::Bare);
        assert_eq!(SpecifierKind::of("@scope/pkg"), SpecifierKind::Bare);
        assert_eq!(SpecifierKind::of("node:fs"), SpecifierKind::Builtin);
    }

    #[test]
    fn test_relative_resolution_is_normalized() {
        let dir = tempdir().unwrap();
        let importer = dir.path().join("src/app/main.ts");
        write(&importer, "");
        write(&dir.path().join("src/shared/util.ts"), "");

        let mut resolver = ModuleResolver::new();
        assert_eq!(
            resolver.resolve("../shared/util", &importer),
            Some(dir.path().join("src/shared/util.ts"))
        );
    }

    #[test]
    fn test_literal_beats_suffixed() {
        let dir = tempdir().unwrap();
        let importer = dir.path().join("entry.js");
        write(&dir.path().join("a"), "");
        write(&dir.path().join("a.ts"), "");

        let mut resolver = ModuleResolver::new();
        assert_eq!(resolver.resolve("./a", &importer), Some(dir.path().join("a")));
    }

    #[test]
    fn test_absolute_specifier() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("lib/x.mjs");
        write(&target, "");

        let spec = dir.path().join("lib/x");
        let mut resolver = ModuleResolver::new();
        assert_eq!(
            resolver.resolve(spec.to_str().unwrap(), Path::new("/elsewhere/y.js")),
            Some(target)
        );
    }

    #[test]
    fn test_scoped_subpath_through_exports() {
        let dir = tempdir().unwrap();
        let pkg = dir.path().join("node_modules/@scope/pkg");
        write(
            &pkg.join("package.json"),
            r#"{"name": "@scope/pkg", "exports": {"./sub": {"import": "./dist/sub.mjs", "require": "./dist/sub.cjs"}}}"#,
        );
        write(&pkg.join("dist/sub.mjs"), "");
        write(&pkg.join("dist/sub.cjs"), "");
        let importer = dir.path().join("src/index.ts");

        let mut resolver = ModuleResolver::new();
        assert_eq!(
            resolver.resolve("@scope/pkg/sub", &importer),
            Some(pkg.join("dist/sub.mjs"))
        );
    }

    #[test]
    fn test_builtins_and_misses() {
        let dir = tempdir().unwrap();
        let importer = dir.path().join("a.js");

        let mut resolver = ModuleResolver::new();
        assert_eq!(resolver.resolve("node:path", &importer), None);
        assert_eq!(resolver.resolve("./missing", &importer), None);
        assert_eq!(resolver.resolve("not-installed", &importer), None);
    }

    #[test]
    fn test_memo_returns_stale_result_until_cleared() {
        let dir = tempdir().unwrap();
        let importer = dir.path().join("entry.js");

        let mut resolver = ModuleResolver::new();
        assert_eq!(resolver.resolve("./late", &importer), None);
        assert_eq!(resolver.memo_len(), 1);

        write(&dir.path().join("late.js"), "");
        assert_eq!(resolver.resolve("./late", &importer), None);

        resolver.clear();
        assert_eq!(
            resolver.resolve("./late", &importer),
            Some(dir.path().join("late.js"))
        );
    }

    #[test]
    fn test_memo_is_keyed_by_importer_dir() {
        let dir = tempdir().unwrap();
        write(&dir.path().join("a/util.js"), "");
        write(&dir.path().join("b/util.ts"), "");

        let mut resolver = ModuleResolver::new();
        assert_eq!(
            resolver.resolve("./util", &dir.path().join("a/x.js")),
            Some(dir.path().join("a/util.js"))
        );
        assert_eq!(
            resolver.resolve("./util", &dir.path().join("b/x.js")),
            Some(dir.path().join("b/util.ts"))
        );
        assert_eq!(resolver.memo_len(), 2);
    }

    #[test]
    fn test_without_memo_sees_new_files() {
        let dir = tempdir().unwrap();
        let importer = dir.path().join("entry.js");

        let mut resolver = ModuleResolver::without_memo();
        assert!(!resolver.is_memoizing());
        assert_eq!(resolver.resolve("./late", &importer), None);

        write(&dir.path().join("late.js"), "");
        assert_eq!(
            resolver.resolve("./late", &importer),
            Some(dir.path().join("late.js"))
        );
        assert_eq!(resolver.memo_len(), 0);
    }
}
