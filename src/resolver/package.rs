//! Bare specifier resolution through `node_modules` directories.

use std::path::{Path, PathBuf};
use tracing::debug;

use super::exports::export_target;
use super::probe::probe;
use crate::parser::package_json;

/// Splits a bare specifier into its package name and subpath.
///
/// Scoped packages keep two segments as the name. Returns `None` for a
/// scope with no package name.
///
/// # Example
///
/// ```
/// use chainscope::resolver::split_package_specifier;
///
/// assert_eq!(split_package_specifier("lodash"), Some(("lodash", "")));
/// assert_eq!(split_package_specifier("lodash/fp/get"), Some(("lodash", "fp/get")));
/// assert_eq!(split_package_specifier("@scope/pkg/sub"), Some(("@scope/pkg", "sub")));
/// assert_eq!(split_package_specifier("@scope"), None);
/// ```
pub fn split_package_specifier(specifier: &str) -> Option<(&str, &str)> {
    let name_len = if specifier.starts_with('@') {
        let mut parts = specifier.splitn(3, '/');
        let scope = parts.next().filter(|s| s.len() > 1)?;
        let name = parts.next().filter(|n| !n.is_empty())?;
        scope.len() + 1 + name.len()
    } else {
        specifier.split('/').next().filter(|n| !n.is_empty())?.len()
    };

    let name = &specifier[..name_len];
    let subpath = specifier[name_len..].trim_start_matches('/');
    Some((name, subpath))
}

/// Walks up from `start_dir` looking for the package in each
/// `node_modules` directory, returning the first file that matches.
pub fn resolve_bare(specifier: &str, start_dir: &Path) -> Option<PathBuf> {
    let (package_name, subpath) = split_package_specifier(specifier)?;

    start_dir.ancestors().find_map(|ancestor| {
        let package_root = ancestor.join("node_modules").join(package_name);
        if !package_root.is_dir() {
            return None;
        }
        resolve_in_package(&package_root, subpath)
    })
}

/// Resolves `subpath` inside one installed package.
///
/// The manifest's `exports` entry is tried first, then `main` for the
/// package root, then the subpath as a plain file or directory.
pub fn resolve_in_package(package_root: &Path, subpath: &str) -> Option<PathBuf> {
    let manifest_path = package_root.join("package.json");

    if manifest_path.is_file() {
        match package_json::parse_file(&manifest_path) {
            Ok(manifest) => {
                let export_key = if subpath.is_empty() {
                    ".".to_string()
                } else {
                    format!("./{subpath}")
                };

                let exported = manifest
                    .exports
                    .as_ref()
                    .and_then(|exports| export_target(exports, &export_key))
                    .and_then(|target| probe(&package_root.join(target)));
                if exported.is_some() {
                    return exported;
                }

                if subpath.is_empty() {
                    if let Some(found) = probe(&package_root.join(manifest.main_entry())) {
                        return Some(found);
                    }
                }
            }
            Err(err) => {
                debug!(path = %manifest_path.display(), error = %err, "ignoring unreadable package manifest");
            }
        }
    }

    if subpath.is_empty() {
        probe(package_root)
    } else {
        probe(&package_root.join(subpath))
    }
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
    fn test_split_package_specifier() {
        assert_eq!(split_package_specifier("react"), Some(("react", "")));
        assert_eq!(split_package_specifier("react/jsx-runtime"), Some(("react", "jsx-runtime")));
        assert_eq!(split_package_specifier("@babel/core"), Some(("@babel/core", "")));
        assert_eq!(
            split_package_specifier("@babel/core/lib/parse"),
            Some(("@babel/core", "lib/parse"))
        );
        assert_eq!(split_package_specifier("@scope/"), None);
        assert_eq!(split_package_specifier(""), None);
    }

    #[test]
    fn test_exports_over_main() {
        let dir = tempdir().unwrap();
        let pkg = dir.path().join("node_modules/pkg");
        write(
            &pkg.join("package.json"),
            r#"{"main": "./main.js", "exports": {".": {"import": "./esm.js"}}}"#,
        );
        write(&pkg.join("main.js"), "");
        write(&pkg.join("esm.js"), "");

        assert_eq!(resolve_bare("pkg", dir.path()), Some(pkg.join("esm.js")));
    }

    #[test]
    fn test_main_fallback() {
        let dir = tempdir().unwrap();
        let pkg = dir.path().join("node_modules/pkg");
        write(&pkg.join("package.json"), r#"{"main": "lib/entry"}"#);
        write(&pkg.join("lib/entry.cjs"), "");

        assert_eq!(resolve_bare("pkg", dir.path()), Some(pkg.join("lib/entry.cjs")));
    }

    #[test]
    fn test_default_main_is_index_js() {
        let dir = tempdir().unwrap();
        let pkg = dir.path().join("node_modules/pkg");
        write(&pkg.join("package.json"), r#"{"name": "pkg"}"#);
        write(&pkg.join("index.js"), "");

        assert_eq!(resolve_bare("pkg", dir.path()), Some(pkg.join("index.js")));
    }

    #[test]
    fn test_subpath_without_exports() {
        let dir = tempdir().unwrap();
        let pkg = dir.path().join("node_modules/lodash");
        write(&pkg.join("package.json"), r#"{"main": "lodash.js"}"#);
        write(&pkg.join("lodash.js"), "");
        write(&pkg.join("get.js"), "");

        assert_eq!(resolve_bare("lodash/get", dir.path()), Some(pkg.join("get.js")));
    }

    #[test]
    fn test_main_is_not_used_for_subpaths() {
        let dir = tempdir().unwrap();
        let pkg = dir.path().join("node_modules/pkg");
        write(&pkg.join("package.json"), r#"{"main": "main.js"}"#);
        write(&pkg.join("main.js"), "");
        write(&pkg.join("sub.js"), "");

        assert_eq!(resolve_bare("pkg/sub", dir.path()), Some(pkg.join("sub.js")));
        assert_eq!(resolve_bare("pkg/missing", dir.path()), None);
        assert_eq!(resolve_bare("pkg", dir.path()), Some(pkg.join("main.js")));
    }

    #[test]
    fn test_malformed_manifest_falls_through() {
        let dir = tempdir().unwrap();
        let pkg = dir.path().join("node_modules/broken");
        write(&pkg.join("package.json"), "{ not json");
        write(&pkg.join("index.ts"), "");

        assert_eq!(resolve_bare("broken", dir.path()), Some(pkg.join("index.ts")));
    }

    #[test]
    fn test_walks_up_to_ancestor_node_modules() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("packages/app/src");
        fs::create_dir_all(&nested).unwrap();
        let pkg = dir.path().join("node_modules/shared");
        write(&pkg.join("index.js"), "");

        assert_eq!(resolve_bare("shared", &nested), Some(pkg.join("index.js")));
    }

    #[test]
    fn test_nearest_node_modules_wins() {
        let dir = tempdir().unwrap();
        let app = dir.path().join("app");
        write(&dir.path().join("node_modules/dup/index.js"), "");
        write(&app.join("node_modules/dup/index.js"), "");

        assert_eq!(
            resolve_bare("dup", &app),
            Some(app.join("node_modules/dup/index.js"))
        );
    }

    #[test]
    fn test_missing_package() {
        let dir = tempdir().unwrap();
        assert_eq!(resolve_bare("nope", dir.path()), None);
    }
}
