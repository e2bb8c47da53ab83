//! Filesystem probing with suffix and index fallbacks.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Suffixes tried after the literal path, in priority order.
pub const RESOLVE_SUFFIXES: &[&str] = &[".js", ".ts", ".jsx", ".tsx", ".mjs", ".cjs", ".json"];

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut raw = OsString::from(base.as_os_str());
    raw.push(suffix);
    PathBuf::from(raw)
}

/// Tries `base` itself, then `base` with each suffix appended.
pub fn probe_file(base: &Path) -> Option<PathBuf> {
    if base.is_file() {
        return Some(base.to_path_buf());
    }
    RESOLVE_SUFFIXES
        .iter()
        .map(|suffix| with_suffix(base, suffix))
        .find(|candidate| candidate.is_file())
}

/// Tries `dir/index<suffix>` for each suffix.
pub fn probe_index(dir: &Path) -> Option<PathBuf> {
    let index = dir.join("index");
    RESOLVE_SUFFIXES
        .iter()
        .map(|suffix| with_suffix(&index, suffix))
        .find(|candidate| candidate.is_file())
}

/// File probing first, then index probing.
pub fn probe(base: &Path) -> Option<PathBuf> {
    probe_file(base).or_else(|| probe_index(base))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_literal_path_wins_over_suffix() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a"), "").unwrap();
        fs::write(dir.path().join("a.ts"), "").unwrap();

        assert_eq!(probe(&dir.path().join("a")), Some(dir.path().join("a")));
    }

    #[test]
    fn test_suffix_priority() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.ts"), "").unwrap();
        fs::write(dir.path().join("a.js"), "").unwrap();
        fs::write(dir.path().join("a.json"), "").unwrap();

        assert_eq!(probe(&dir.path().join("a")), Some(dir.path().join("a.js")));
    }

    #[test]
    fn test_suffix_appended_not_replaced() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("button.styles.ts"), "").unwrap();

        assert_eq!(
            probe(&dir.path().join("button.styles")),
            Some(dir.path().join("button.styles.ts"))
        );
    }

    #[test]
    fn test_index_fallback() {
        let dir = tempdir().unwrap();
        let lib = dir.path().join("lib");
        fs::create_dir(&lib).unwrap();
        fs::write(lib.join("index.tsx"), "").unwrap();

        assert_eq!(probe(&lib), Some(lib.join("index.tsx")));
    }

    #[test]
    fn test_file_beats_directory_index() {
        let dir = tempdir().unwrap();
        let lib = dir.path().join("lib");
        fs::create_dir(&lib).unwrap();
        fs::write(lib.join("index.js"), "").unwrap();
        fs::write(dir.path().join("lib.ts"), "").unwrap();

        assert_eq!(probe(&lib), Some(dir.path().join("lib.ts")));
    }

    #[test]
    fn test_nothing_found() {
        let dir = tempdir().unwrap();
        assert_eq!(probe(&dir.path().join("missing")), None);
    }
}
