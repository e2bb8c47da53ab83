//! esbuild metafile parser
//!
//! Reads the `inputs` section of an esbuild metafile. Output bundles are
//! ignored; only the per-input import lists matter for chain tracing.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::{DependencyMetadata, MetadataEdge, MetadataResult};

/// Top-level metafile structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Metafile {
    /// Input files keyed by their path relative to the working directory
    #[serde(default)]
    pub inputs: BTreeMap<String, MetafileInput>,
}

/// One input file.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct MetafileInput {
    /// Size in bytes
    #[serde(default)]
    pub bytes: u64,

    #[serde(default)]
    pub imports: Vec<MetafileImport>,
}

/// One import of an input file.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct MetafileImport {
    /// Resolved path, or the raw specifier for externals
    pub path: String,

    /// Import kind (e.g. "import-statement", "require-call", "dynamic-import")
    #[serde(default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub external: bool,

    /// Specifier as written in the source
    #[serde(default)]
    pub original: Option<String>,
}

impl Metafile {
    /// Parse a metafile from disk.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the metafile JSON
    ///
    /// # Returns
    ///
    /// The parsed `Metafile` or a `MetadataError`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> MetadataResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse_str(&content)
    }

    /// Parse a metafile from a JSON string.
    pub fn parse_str(json: &str) -> MetadataResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl DependencyMetadata for Metafile {
    fn import_edges(&self) -> Vec<MetadataEdge> {
        self.inputs
            .iter()
            .flat_map(|(importer, input)| {
                input
                    .imports
                    .iter()
                    .filter(|import| !import.path.is_empty())
                    .map(move |import| MetadataEdge::new(importer, &import.path, import.external))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::MetadataError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"{
        "inputs": {
            "src/app.ts": {
                "bytes": 120,
                "imports": [
                    { "path": "src/util.ts", "kind": "import-statement", "original": "./util" },
                    { "path": "react", "kind": "import-statement", "external": true },
                    { "path": "src/lazy.ts", "kind": "dynamic-import" }
                ]
            },
            "src/util.ts": { "bytes": 40, "imports": [] },
            "src/lazy.ts": { "bytes": 10, "imports": [] }
        },
        "outputs": { "dist/app.js": { "bytes": 900 } }
    }"#;

    #[test]
    fn test_parse_sample() {
        let metafile = Metafile::parse_str(SAMPLE).unwrap();
        assert_eq!(metafile.inputs.len(), 3);

        let app = &metafile.inputs["src/app.ts"];
        assert_eq!(app.bytes, 120);
        assert_eq!(app.imports[0].original.as_deref(), Some("./util"));
        assert_eq!(app.imports[2].kind.as_deref(), Some("dynamic-import"));
    }

    #[test]
    fn test_import_edges() {
        let metafile = Metafile::parse_str(SAMPLE).unwrap();
        let edges = metafile.import_edges();

        assert_eq!(
            edges,
            vec![
                MetadataEdge::new("src/app.ts", "src/util.ts", false),
                MetadataEdge::new("src/app.ts", "react", true),
                MetadataEdge::new("src/app.ts", "src/lazy.ts", false),
            ]
        );
    }

    #[test]
    fn test_parse_empty() {
        let metafile = Metafile::parse_str("{}").unwrap();
        assert!(metafile.import_edges().is_empty());
    }

    #[test]
    fn test_invalid_json() {
        let result = Metafile::parse_str("{ inputs: ");
        assert!(matches!(result, Err(MetadataError::Json(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let metafile = Metafile::from_file(file.path()).unwrap();
        assert_eq!(metafile.import_edges().len(), 3);
    }

    #[test]
    fn test_missing_file() {
        let result = Metafile::from_file("/definitely/not/here/meta.json");
        assert!(matches!(result, Err(MetadataError::Io(_))));
    }
}
