//! Webpack bundle stats parser
//!
//! This module handles parsing of webpack `stats.json` output to extract
//! the module graph: every module lists the `reasons` it was included,
//! and each reason names the importing module.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::{DependencyMetadata, MetadataEdge, MetadataResult};

/// Represents a webpack stats.json file output.
///
/// Only the fields needed to rebuild import edges are read; everything
/// else in the file is ignored.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WebpackStats {
    /// Webpack version used for the build
    pub version: Option<String>,

    /// Build context directory, if recorded
    pub context: Option<String>,

    /// List of all modules included in the build
    #[serde(default)]
    pub modules: Vec<WebpackModule>,
}

/// Represents a module in the webpack build.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WebpackModule {
    /// Unique module identifier (loader chain plus absolute path)
    pub identifier: Option<String>,

    /// Short module name/path, relative to the context
    pub name: Option<String>,

    /// Reasons why this module was included
    #[serde(default)]
    pub reasons: Vec<ModuleReason>,

    /// Nested modules (for concatenated modules)
    #[serde(default)]
    pub modules: Vec<WebpackModule>,
}

/// Reason why a module was included in the build.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ModuleReason {
    /// Module identifier that imported this
    pub module_identifier: Option<String>,

    /// Module name that imported this
    pub module_name: Option<String>,

    /// Type of reason (e.g., "harmony import")
    #[serde(rename = "type")]
    pub reason_type: Option<String>,

    /// User request string
    pub user_request: Option<String>,
}

/// How a webpack module identifier refers to a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleRef {
    /// A file, with loaders stripped
    File(String),
    /// `external "react"` style modules, holding the request
    External(String),
}

impl WebpackStats {
    /// Load webpack stats from a JSON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the stats.json file
    ///
    /// # Returns
    ///
    /// The parsed `WebpackStats` or a `MetadataError`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> MetadataResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse_str(&content)
    }

    /// Parse webpack stats from a JSON string.
    pub fn parse_str(json: &str) -> MetadataResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Get all modules as a flat list (including nested ones).
    pub fn all_modules(&self) -> Vec<&WebpackModule> {
        let mut result = Vec::new();
        collect_modules(&self.modules, &mut result);
        result
    }
}

/// Recursively collect all modules.
fn collect_modules<'a>(modules: &'a [WebpackModule], result: &mut Vec<&'a WebpackModule>) {
    for module in modules {
        result.push(module);
        if !module.modules.is_empty() {
            collect_modules(&module.modules, result);
        }
    }
}

impl WebpackModule {
    /// The module this entry describes, preferring the identifier.
    pub fn module_ref(&self) -> Option<ModuleRef> {
        classify(self.identifier.as_deref(), self.name.as_deref())
    }
}

impl ModuleReason {
    /// The importing module, or `None` for entry and unnamed reasons.
    pub fn importer(&self) -> Option<ModuleRef> {
        classify(
            self.module_identifier.as_deref(),
            self.module_name.as_deref(),
        )
    }
}

fn classify(identifier: Option<&str>, name: Option<&str>) -> Option<ModuleRef> {
    if let Some(id) = identifier.filter(|id| !id.is_empty()) {
        if let Some(request) = parse_external(id) {
            return Some(ModuleRef::External(request));
        }
        let resource = strip_loaders(id);
        if Path::new(resource).is_absolute() {
            return Some(ModuleRef::File(resource.to_string()));
        }
    }

    let name = name.filter(|n| !n.is_empty())?;
    if let Some(request) = parse_external(name) {
        return Some(ModuleRef::External(request));
    }
    Some(ModuleRef::File(strip_loaders(name).to_string()))
}

/// Drops the loader chain (`loader!loader!resource`) and any query.
///
/// # Example
///
/// ```
/// use chainscope::bundle::webpack::strip_loaders;
///
/// assert_eq!(
///     strip_loaders("/p/node_modules/babel-loader/lib/index.js!/p/src/app.js"),
///     "/p/src/app.js"
/// );
/// assert_eq!(strip_loaders("./src/app.js?raw"), "./src/app.js");
/// ```
pub fn strip_loaders(identifier: &str) -> &str {
    let resource = identifier.rsplit('!').next().unwrap_or(identifier);
    resource.split('?').next().unwrap_or(resource)
}

/// Reads the request out of `external "react"` identifiers.
fn parse_external(identifier: &str) -> Option<String> {
    let rest = identifier.strip_prefix("external ")?;
    let request = rest.trim().trim_matches(|c| c == '"' || c == '\'');
    (!request.is_empty()).then(|| request.to_string())
}

impl DependencyMetadata for WebpackStats {
    fn import_edges(&self) -> Vec<MetadataEdge> {
        let mut edges = Vec::new();

        for module in self.all_modules() {
            let Some(imported) = module.module_ref() else {
                continue;
            };

            for reason in &module.reasons {
                // External importers do not import anything
                let Some(ModuleRef::File(importer)) = reason.importer() else {
                    continue;
                };

                let edge = match &imported {
                    ModuleRef::File(path) => MetadataEdge::new(importer, path, false),
                    ModuleRef::External(request) => MetadataEdge::new(importer, request, true),
                };
                if !edges.contains(&edge) {
                    edges.push(edge);
                }
            }
        }

        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::MetadataError;

    #[test]
    fn test_strip_loaders() {
        assert_eq!(strip_loaders("/p/src/a.js"), "/p/src/a.js");
        assert_eq!(
            strip_loaders("/p/node_modules/css-loader/index.js!/p/node_modules/sass-loader/index.js!/p/src/a.scss"),
            "/p/src/a.scss"
        );
        assert_eq!(strip_loaders("./a.js?inline"), "./a.js");
    }

    #[test]
    fn test_module_ref_prefers_absolute_identifier() {
        let module = WebpackModule {
            identifier: Some("/p/node_modules/babel-loader/lib/index.js!/p/src/app.js".into()),
            name: Some("./src/app.js".into()),
            ..Default::default()
        };
        assert_eq!(module.module_ref(), Some(ModuleRef::File("/p/src/app.js".into())));
    }

    #[test]
    fn test_module_ref_falls_back_to_name() {
        let module = WebpackModule {
            identifier: Some("multi ./src/a.js ./src/b.js".into()),
            name: Some("./src/app.js".into()),
            ..Default::default()
        };
        assert_eq!(module.module_ref(), Some(ModuleRef::File("./src/app.js".into())));
    }

    #[test]
    fn test_external_module() {
        let module = WebpackModule {
            identifier: Some("external \"react\"".into()),
            name: Some("external \"react\"".into()),
            ..Default::default()
        };
        assert_eq!(module.module_ref(), Some(ModuleRef::External("react".into())));
    }

    #[test]
    fn test_parse_and_collect_edges() {
        let json = r#"{
            "version": "5.88.0",
            "modules": [
                {
                    "identifier": "/p/src/index.js",
                    "name": "./src/index.js",
                    "reasons": [{ "type": "entry", "userRequest": "./src/index.js" }]
                },
                {
                    "identifier": "/p/src/app.js",
                    "name": "./src/app.js",
                    "reasons": [
                        { "moduleIdentifier": "/p/src/index.js", "moduleName": "./src/index.js", "type": "harmony side effect evaluation" },
                        { "moduleIdentifier": "/p/src/index.js", "moduleName": "./src/index.js", "type": "harmony import specifier" }
                    ]
                },
                {
                    "identifier": "external \"react\"",
                    "name": "external \"react\"",
                    "reasons": [{ "moduleName": "./src/app.js", "type": "harmony import" }]
                }
            ]
        }"#;

        let stats = WebpackStats::parse_str(json).unwrap();
        assert_eq!(stats.version.as_deref(), Some("5.88.0"));

        let edges = stats.import_edges();
        assert_eq!(
            edges,
            vec![
                MetadataEdge::new("/p/src/index.js", "/p/src/app.js", false),
                MetadataEdge::new("./src/app.js", "react", true),
            ]
        );
    }

    #[test]
    fn test_nested_modules_contribute_edges() {
        let json = r#"{
            "modules": [
                {
                    "name": "./src/index.js + 1 modules",
                    "modules": [
                        {
                            "identifier": "/p/src/util.js",
                            "reasons": [{ "moduleIdentifier": "/p/src/index.js" }]
                        }
                    ]
                }
            ]
        }"#;

        let stats = WebpackStats::parse_str(json).unwrap();
        assert_eq!(stats.all_modules().len(), 2);
        assert_eq!(
            stats.import_edges(),
            vec![MetadataEdge::new("/p/src/index.js", "/p/src/util.js", false)]
        );
    }

    #[test]
    fn test_parse_empty_stats() {
        let stats = WebpackStats::parse_str("{}").unwrap();
        assert!(stats.modules.is_empty());
        assert!(stats.import_edges().is_empty());
    }

    #[test]
    fn test_invalid_stats() {
        assert!(matches!(
            WebpackStats::parse_str("[1, 2"),
            Err(MetadataError::Json(_))
        ));
    }
}
