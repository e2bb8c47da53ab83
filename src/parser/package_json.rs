//! Parser for npm package.json files.
//!
//! The resolver reads manifests of installed packages to find their entry
//! files. Parse failures are reported as [`ParseError`] and the resolver
//! treats them as "no manifest".

use std::fs;
use std::path::Path;

use super::types::PackageJson;

/// Errors that can occur during package.json parsing.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to read the file from disk.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse JSON content.
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for parser operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a package.json file from a file path.
///
/// # Arguments
///
/// * `path` - Path to the package.json file
///
/// # Returns
///
/// A `ParseResult` containing the parsed `PackageJson` or an error.
pub fn parse_file(path: &Path) -> ParseResult<PackageJson> {
    let content = fs::read_to_string(path)?;
    parse_str(&content)
}

/// Parses a package.json from a string.
///
/// # Example
///
/// ```
/// use chainscope::parser::package_json::parse_str;
///
/// let json = r#"{"name": "my-app", "version": "1.0.0"}"#;
/// let pkg = parse_str(json).unwrap();
/// assert_eq!(pkg.name, Some("my-app".to_string()));
/// ```
pub fn parse_str(content: &str) -> ParseResult<PackageJson> {
    let pkg: PackageJson = serde_json::from_str(content)?;
    Ok(pkg)
}
