//! Shared types for manifest parsing.
//!
//! This module defines the subset of a package manifest the resolver
//! reads to locate a package's entry files.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Represents the structure of a package.json file.
///
/// Only the fields that influence module resolution are kept. The
/// `exports` field is left as raw JSON because its shape varies between
/// a string, a subpath map, and nested condition objects.
///
/// # Example
///
/// ```
/// use chainscope::parser::types::PackageJson;
///
/// let json = r#"{"name": "my-lib", "main": "lib/index.js"}"#;
/// let pkg: PackageJson = serde_json::from_str(json).unwrap();
/// assert_eq!(pkg.main_entry(), "lib/index.js");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PackageJson {
    /// The name of the package.
    pub name: Option<String>,

    /// The version of the package (semver format).
    pub version: Option<String>,

    /// Legacy entry point, relative to the package root.
    pub main: Option<String>,

    /// Subpath and condition map of exposed files.
    pub exports: Option<Value>,
}

impl PackageJson {
    /// Entry file used when no `exports` entry matches, `index.js` by default.
    pub fn main_entry(&self) -> &str {
        self.main.as_deref().unwrap_or("index.js")
    }

    /// Returns true if the package declares an `exports` field.
    pub fn has_exports(&self) -> bool {
        self.exports.as_ref().is_some_and(|e| !e.is_null())
    }
}
