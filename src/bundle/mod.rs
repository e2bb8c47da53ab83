//! Host bundler dependency metadata.
//!
//! Bundlers record which module pulled in which. This module reads that
//! record so the build-end hook can merge edges the source scanner could
//! not see (aliases, virtual modules, loader-injected imports).
//!
//! # Supported Formats
//!
//! - **esbuild**: the `metafile` JSON (`inputs` map with per-file `imports`)
//! - **Webpack**: `stats.json` produced with `--json` (modules with `reasons`)
//!
//! # Example
//!
//! ```
//! use chainscope::bundle::{DependencyMetadata, Metafile};
//!
//! let metafile = Metafile::parse_str(r#"{
//!     "inputs": {
//!         "src/index.js": { "imports": [{ "path": "src/app.js", "kind": "import-statement" }] },
//!         "src/app.js": { "imports": [] }
//!     }
//! }"#).unwrap();
//!
//! let edges = metafile.import_edges();
//! assert_eq!(edges.len(), 1);
//! assert_eq!(edges[0].importer, "src/index.js");
//! assert_eq!(edges[0].imported, "src/app.js");
//! ```

pub mod metafile;
pub mod webpack;

use std::path::Path;
use thiserror::Error;

use crate::paths::{absolutize, path_key};

// Re-export main types for convenience
pub use metafile::{Metafile, MetafileImport, MetafileInput};
pub use webpack::{ModuleReason, ModuleRef, WebpackModule, WebpackStats};

/// Errors that can occur while reading host metadata.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Failed to read metadata file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse metadata JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for metadata operations.
pub type MetadataResult<T> = Result<T, MetadataError>;

/// One importer → imported relation reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEdge {
    /// Path of the importing module, as written by the host
    pub importer: String,
    /// Path (or raw specifier, for externals) of the imported module
    pub imported: String,
    /// Whether the host left the import unbundled
    pub external: bool,
}

impl MetadataEdge {
    pub fn new(importer: impl Into<String>, imported: impl Into<String>, external: bool) -> Self {
        Self {
            importer: importer.into(),
            imported: imported.into(),
            external,
        }
    }

    /// Makes the paths absolute against `cwd`.
    ///
    /// External imports keep their raw specifier so that the graph's
    /// externality filter sees them as bare names.
    pub fn absolutized(&self, cwd: &Path) -> Self {
        let imported = if self.external {
            self.imported.clone()
        } else {
            path_key(&absolutize(Path::new(&self.imported), cwd))
        };
        Self {
            importer: path_key(&absolutize(Path::new(&self.importer), cwd)),
            imported,
            external: self.external,
        }
    }
}

/// A source of host dependency edges.
pub trait DependencyMetadata {
    /// Every import relation the host recorded, in file order.
    fn import_edges(&self) -> Vec<MetadataEdge>;
}
