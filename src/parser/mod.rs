//! Parser module for chainscope.
//!
//! This module extracts module specifiers from JavaScript/TypeScript
//! source text and reads package manifests for the resolver.
//!
//! # Extractors
//!
//! - [`LexicalExtractor`] - pattern based, the default
//! - [`SyntaxExtractor`] - tree-sitter based, slower but ignores comments and strings
//!
//! Both implement [`SpecifierExtractor`], so the graph builder does not
//! care which one is in use.
//!
//! # Example
//!
//! ```
//! use chainscope::parser::{extractor_for, resolvable_specifiers, ExtractorKind};
//!
//! let mut extractor = extractor_for(ExtractorKind::Lexical).unwrap();
//! let source = r#"
//!     import logo from "data:image/png;base64,AAAA";
//!     import { util } from "./util";
//! "#;
//!
//! let specifiers = resolvable_specifiers(extractor.as_mut(), source, "ts");
//! assert_eq!(specifiers, vec!["./util"]);
//! ```

pub mod lexical;
pub mod package_json;
pub mod syntax;
pub mod types;

use serde::Deserialize;
use thiserror::Error;

// Re-export commonly used types for convenience
pub use lexical::LexicalExtractor;
pub use package_json::{parse_file, parse_str, ParseError, ParseResult};
pub use syntax::{SourceLanguage, SyntaxExtractor};
pub use types::PackageJson;

/// File extensions whose contents are scanned for specifiers.
pub const SCANNED_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "mjs", "cjs"];

/// Specifier prefixes that never name a file on disk.
const UNRESOLVABLE_PREFIXES: &[&str] = &["data:", "http:", "https:"];

/// Errors that can occur while setting up an extractor.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid specifier pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Tree-sitter language initialization failed")]
    LanguageInit,

    #[error("Cannot determine working directory: {0}")]
    WorkingDir(#[source] std::io::Error),
}

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Extracts raw module specifiers from source text.
pub trait SpecifierExtractor: Send {
    /// Returns every specifier found in `source`, duplicates included.
    ///
    /// Static imports come first, then `require()` calls, then dynamic
    /// `import()` calls. Files whose `extension` is not in
    /// [`SCANNED_EXTENSIONS`] yield an empty list.
    fn extract(&mut self, source: &str, extension: &str) -> Vec<String>;
}

/// Which extractor implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorKind {
    #[default]
    Lexical,
    Syntax,
}

/// Builds the extractor for `kind`.
pub fn extractor_for(kind: ExtractorKind) -> AnalysisResult<Box<dyn SpecifierExtractor>> {
    Ok(match kind {
        ExtractorKind::Lexical => Box::new(LexicalExtractor::new()?),
        ExtractorKind::Syntax => Box::new(SyntaxExtractor::new()?),
    })
}

/// Returns true if files with this extension are scanned.
///
/// Accepts the extension with or without its leading dot.
pub fn is_scanned_extension(extension: &str) -> bool {
    let ext = extension.trim_start_matches('.').to_lowercase();
    SCANNED_EXTENSIONS.contains(&ext.as_str())
}

/// Returns false for `data:` and `http(s):` specifiers.
pub fn is_resolvable_specifier(specifier: &str) -> bool {
    !UNRESOLVABLE_PREFIXES
        .iter()
        .any(|prefix| specifier.starts_with(prefix))
}

/// Extracts specifiers and drops those that can never resolve to a file.
pub fn resolvable_specifiers(
    extractor: &mut dyn SpecifierExtractor,
    source: &str,
    extension: &str,
) -> Vec<String> {
    extractor
        .extract(source, extension)
        .into_iter()
        .filter(|s| is_resolvable_specifier(s))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_scanned_extension() {
        for ext in ["js", "jsx", "ts", "tsx", "mjs", "cjs", ".ts", "TSX"] {
            assert!(is_scanned_extension(ext), "{ext} should be scanned");
        }
        for ext in ["json", "css", "d", ""] {
            assert!(!is_scanned_extension(ext), "{ext} should not be scanned");
        }
    }

    #[test]
    fn test_is_resolvable_specifier() {
        assert!(is_resolvable_specifier("./a"));
        assert!(is_resolvable_specifier("react"));
        assert!(!is_resolvable_specifier("data:text/javascript,export default 1"));
        assert!(!is_resolvable_specifier("http://cdn.example.com/x.js"));
        assert!(!is_resolvable_specifier("https://cdn.example.com/x.js"));
    }

    #[test]
    fn test_both_extractors_agree_on_plain_source() {
        let source = r#"
            import a from './a';
            export * from './b';
            const c = require('./c');
            const d = import('./d');
        "#;

        for kind in [ExtractorKind::Lexical, ExtractorKind::Syntax] {
            let mut extractor = extractor_for(kind).unwrap();
            assert_eq!(
                resolvable_specifiers(extractor.as_mut(), source, "js"),
                vec!["./a", "./b", "./c", "./d"],
                "extractor {kind:?}"
            );
        }
    }

    #[test]
    fn test_remote_specifiers_filtered() {
        let mut extractor = extractor_for(ExtractorKind::Lexical).unwrap();
        let source = r#"
            import x from "https://esm.sh/x";
            import y from "./y";
        "#;
        assert_eq!(resolvable_specifiers(extractor.as_mut(), source, "js"), vec!["./y"]);
    }
}
