//! Specifier extraction using tree-sitter for JavaScript/TypeScript.
//!
//! Slower than the lexical scanner but immune to matches inside comments
//! and string literals. Produces the same ordering: static imports and
//! re-exports, then `require()` calls, then dynamic `import()` calls.

use tree_sitter::{Node, Parser, Tree, TreeCursor};

use super::{AnalysisError, AnalysisResult, SpecifierExtractor};

/// Grammar used for a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    JavaScript,
    TypeScript,
    Tsx,
}

impl SourceLanguage {
    /// Determine language from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "js" | "jsx" | "mjs" | "cjs" => Some(SourceLanguage::JavaScript),
            "ts" => Some(SourceLanguage::TypeScript),
            "tsx" => Some(SourceLanguage::Tsx),
            _ => None,
        }
    }
}

/// Specifiers grouped by how they were written.
#[derive(Debug, Default)]
struct Collected {
    statics: Vec<String>,
    requires: Vec<String>,
    dynamics: Vec<String>,
}

/// Extractor backed by tree-sitter grammars.
pub struct SyntaxExtractor {
    js_parser: Parser,
    ts_parser: Parser,
    tsx_parser: Parser,
}

impl std::fmt::Debug for SyntaxExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxExtractor").finish_non_exhaustive()
    }
}

impl SyntaxExtractor {
    /// Create a new SyntaxExtractor.
    pub fn new() -> AnalysisResult<Self> {
        let mut js_parser = Parser::new();
        js_parser
            .set_language(&tree_sitter_javascript::LANGUAGE.into())
            .map_err(|_| AnalysisError::LanguageInit)?;

        let mut ts_parser = Parser::new();
        ts_parser
            .set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
            .map_err(|_| AnalysisError::LanguageInit)?;

        let mut tsx_parser = Parser::new();
        tsx_parser
            .set_language(&tree_sitter_typescript::LANGUAGE_TSX.into())
            .map_err(|_| AnalysisError::LanguageInit)?;

        Ok(Self {
            js_parser,
            ts_parser,
            tsx_parser,
        })
    }

    fn parse(&mut self, source: &str, language: SourceLanguage) -> Option<Tree> {
        let parser = match language {
            SourceLanguage::JavaScript => &mut self.js_parser,
            SourceLanguage::TypeScript => &mut self.ts_parser,
            SourceLanguage::Tsx => &mut self.tsx_parser,
        };
        parser.parse(source, None)
    }
}

impl SpecifierExtractor for SyntaxExtractor {
    fn extract(&mut self, source: &str, extension: &str) -> Vec<String> {
        let Some(language) = SourceLanguage::from_extension(extension) else {
            return Vec::new();
        };
        let Some(tree) = self.parse(source, language) else {
            return Vec::new();
        };

        let mut collected = Collected::default();
        let mut cursor = tree.root_node().walk();
        visit_node(&mut cursor, source, &mut collected);

        let mut specifiers = collected.statics;
        specifiers.extend(collected.requires);
        specifiers.extend(collected.dynamics);
        specifiers
    }
}

/// Recursively visit nodes to find module references.
fn visit_node(cursor: &mut TreeCursor, source: &str, collected: &mut Collected) {
    let node = cursor.node();

    match node.kind() {
        "import_statement" | "export_statement" => {
            if let Some(spec) = node
                .child_by_field_name("source")
                .and_then(|s| extract_string_value(&s, source))
            {
                collected.statics.push(spec);
            }
        }
        "call_expression" => parse_require_or_dynamic_import(&node, source, collected),
        _ => {}
    }

    if cursor.goto_first_child() {
        loop {
            visit_node(cursor, source, collected);
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        cursor.goto_parent();
    }
}

/// Parse require() calls or dynamic import().
fn parse_require_or_dynamic_import(node: &Node, source: &str, collected: &mut Collected) {
    let Some(func_node) = node.child_by_field_name("function") else {
        return;
    };
    let Some(args_node) = node.child_by_field_name("arguments") else {
        return;
    };

    let mut args_cursor = args_node.walk();
    let first_string = args_node
        .children(&mut args_cursor)
        .find(|child| matches!(child.kind(), "string" | "template_string"))
        .and_then(|child| extract_string_value(&child, source));

    let Some(spec) = first_string else {
        return;
    };

    match node_text(&func_node, source) {
        Some("require") => collected.requires.push(spec),
        Some("import") => collected.dynamics.push(spec),
        _ => {}
    }
}

/// Extract the text content of a node.
fn node_text<'a>(node: &Node, source: &'a str) -> Option<&'a str> {
    source.get(node.start_byte()..node.end_byte())
}

/// Extract string value (removes quotes).
fn extract_string_value(node: &Node, source: &str) -> Option<String> {
    let text = node_text(node, source)?;
    let trimmed = text
        .trim_start_matches(['"', '\'', '`'])
        .trim_end_matches(['"', '\'', '`']);
    if trimmed.is_empty() || trimmed.contains("${") {
        return None;
    }
    Some(trimmed.to_string())
}
