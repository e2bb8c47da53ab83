//! Tracer configuration.
//!
//! Options are read from a JSON file and may be overridden field by field
//! from the command line. Every field has a default, so `{}` is a valid
//! configuration.
//!
//! # Example
//!
//! ```
//! use chainscope::config::TracerConfig;
//!
//! let config = TracerConfig::parse_str(r#"{
//!     "cwd": "/proj",
//!     "entry_points": { "app": "src/index.ts" },
//!     "chain_limit": 5
//! }"#).unwrap();
//!
//! assert_eq!(config.entry_points.paths(), vec!["src/index.ts"]);
//! assert_eq!(config.chain_limit, Some(5));
//! assert!(config.memoize_resolution);
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::graph::LookupMode;
use crate::parser::ExtractorKind;
use crate::paths::absolutize;

/// Errors that can occur while loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Entry points as a host passes them: a list of inputs, or a map from
/// output name to input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EntryPoints {
    List(Vec<String>),
    Map(BTreeMap<String, String>),
}

impl Default for EntryPoints {
    fn default() -> Self {
        EntryPoints::List(Vec::new())
    }
}

impl EntryPoints {
    /// The input paths, in list order or by output name for maps.
    pub fn paths(&self) -> Vec<&str> {
        match self {
            EntryPoints::List(paths) => paths.iter().map(String::as_str).collect(),
            EntryPoints::Map(map) => map.values().map(String::as_str).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            EntryPoints::List(paths) => paths.is_empty(),
            EntryPoints::Map(map) => map.is_empty(),
        }
    }
}

impl From<Vec<String>> for EntryPoints {
    fn from(paths: Vec<String>) -> Self {
        EntryPoints::List(paths)
    }
}

/// Runtime configuration for import chain tracing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TracerConfig {
    /// Base directory for relative entry points and metadata paths.
    /// `None` means the process working directory.
    pub cwd: Option<PathBuf>,

    pub entry_points: EntryPoints,

    /// Keep `node_modules` files and unresolved bare imports as graph nodes.
    pub track_external: bool,

    /// How chain queries match a target to a graph node.
    pub lookup: LookupMode,

    /// Which specifier extractor scans loaded files.
    pub extractor: ExtractorKind,

    /// Memoize resolution within a build.
    pub memoize_resolution: bool,

    /// Maximum number of chain renderings per formatted report.
    pub chain_limit: Option<usize>,

    /// Prefix for every formatted note line.
    pub indent: String,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            cwd: None,
            entry_points: EntryPoints::default(),
            track_external: false,
            lookup: LookupMode::default(),
            extractor: ExtractorKind::default(),
            memoize_resolution: true,
            chain_limit: None,
            indent: String::new(),
        }
    }
}

impl TracerConfig {
    /// Load a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_str(&content)
    }

    /// Parse a configuration from a JSON string.
    pub fn parse_str(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The configured working directory made absolute against the
    /// process one, or the process one itself.
    pub fn working_dir(&self) -> io::Result<PathBuf> {
        let process_dir = std::env::current_dir()?;
        Ok(match &self.cwd {
            Some(cwd) => absolutize(cwd, &process_dir),
            None => process_dir,
        })
    }

    /// Set the working directory.
    #[must_use]
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Set the entry points.
    #[must_use]
    pub fn with_entry_points(mut self, entry_points: impl Into<EntryPoints>) -> Self {
        self.entry_points = entry_points.into();
        self
    }

    #[must_use]
    pub fn with_track_external(mut self, track: bool) -> Self {
        self.track_external = track;
        self
    }

    #[must_use]
    pub fn with_lookup(mut self, lookup: LookupMode) -> Self {
        self.lookup = lookup;
        self
    }

    #[must_use]
    pub fn with_extractor(mut self, extractor: ExtractorKind) -> Self {
        self.extractor = extractor;
        self
    }

    #[must_use]
    pub fn with_memoize_resolution(mut self, memoize: bool) -> Self {
        self.memoize_resolution = memoize;
        self
    }

    #[must_use]
    pub fn with_chain_limit(mut self, limit: Option<usize>) -> Self {
        self.chain_limit = limit;
        self
    }
}
