//! Pattern-based specifier extraction.
//!
//! Scans raw source text with regular expressions instead of parsing it.
//! This is fast and needs no grammar, at the cost of matching inside
//! comments and strings and missing unusual syntax.

use regex::Regex;

use super::{is_scanned_extension, AnalysisResult, SpecifierExtractor};

const STATIC_IMPORT: &str = r#"\bimport\s*(?:[\w*{}\s,$]+?\s*from\s*)?["']([^"'\n]+)["']"#;
const RE_EXPORT: &str = r#"\bexport\s*[\w*{}\s,$]+?\s*from\s*["']([^"'\n]+)["']"#;
const REQUIRE_CALL: &str = r#"\brequire\s*\(\s*["'`]([^"'`\n]+)["'`]\s*\)"#;
const DYNAMIC_IMPORT: &str = r#"\bimport\s*\(\s*["'`]([^"'`\n]+)["'`]\s*\)"#;

/// Extracts module specifiers by pattern matching.
///
/// # Example
///
/// ```
/// use chainscope::parser::{LexicalExtractor, SpecifierExtractor};
///
/// let mut extractor = LexicalExtractor::new().unwrap();
/// let source = r#"
///     import React from 'react';
///     const fs = require("fs");
///     const lazy = () => import('./lazy');
/// "#;
///
/// assert_eq!(extractor.extract(source, "js"), vec!["react", "fs", "./lazy"]);
/// ```
#[derive(Debug, Clone)]
pub struct LexicalExtractor {
    static_import: Regex,
    re_export: Regex,
    require_call: Regex,
    dynamic_import: Regex,
}

impl LexicalExtractor {
    /// Compiles the specifier patterns.
    pub fn new() -> AnalysisResult<Self> {
        Ok(Self {
            static_import: Regex::new(STATIC_IMPORT)?,
            re_export: Regex::new(RE_EXPORT)?,
            require_call: Regex::new(REQUIRE_CALL)?,
            dynamic_import: Regex::new(DYNAMIC_IMPORT)?,
        })
    }

    /// Static `import`/`export ... from` specifiers in source order.
    fn static_specifiers(&self, source: &str) -> Vec<String> {
        let mut found: Vec<(usize, String)> = self
            .static_import
            .captures_iter(source)
            .chain(self.re_export.captures_iter(source))
            .filter_map(|caps| caps.get(1).map(|m| (m.start(), m.as_str().to_string())))
            .collect();
        found.sort_by_key(|(start, _)| *start);
        found.into_iter().map(|(_, spec)| spec).collect()
    }
}

fn captured(pattern: &Regex, source: &str) -> Vec<String> {
    pattern
        .captures_iter(source)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

impl SpecifierExtractor for LexicalExtractor {
    fn extract(&mut self, source: &str, extension: &str) -> Vec<String> {
        if !is_scanned_extension(extension) {
            return Vec::new();
        }

        let mut specifiers = self.static_specifiers(source);
        specifiers.extend(captured(&self.require_call, source));
        specifiers.extend(captured(&self.dynamic_import, source));

        // template literals with substitutions cannot be resolved
        specifiers.retain(|s| !s.contains("${"));
        specifiers
    }
}
