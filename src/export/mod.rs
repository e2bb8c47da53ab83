//! Export functionality for import chain query results.
//!
//! This module provides exporters for writing chain reports in various
//! formats: plain text notes, JSON, and Markdown.

pub mod json;
pub mod markdown;
pub mod text;

use crate::format::{common_base, report_paths, shorten};
use crate::graph::ImportChain;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Diagnostic notes, as attached to build errors
    #[default]
    Text,
    /// JSON format - machine-readable, full data
    Json,
    /// Markdown format - documentation/reporting
    Markdown,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ExportFormat::Text),
            "json" => Ok(ExportFormat::Json),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: text, json, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Text => write!(f, "text"),
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Data container for export operations.
///
/// Holds the query results together with the rendering options that
/// the text exporter honors.
#[derive(Debug, Clone, Default)]
pub struct ChainReport {
    /// One result per queried target
    pub results: Vec<ImportChain>,
    /// Prefix for every text line
    pub indent: String,
    /// Maximum number of chain renderings in text output
    pub limit: Option<usize>,
}

impl ChainReport {
    /// Create a report with no indent and no limit.
    pub fn new(results: Vec<ImportChain>) -> Self {
        Self {
            results,
            ..Self::default()
        }
    }

    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Directory that shortened paths are relative to.
    pub fn base(&self) -> Option<PathBuf> {
        common_base(report_paths(&self.results))
    }

    /// Get count of targets with at least one chain
    pub fn reachable_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_reachable()).count()
    }

    /// Get total number of chains across all targets
    pub fn chain_count(&self) -> usize {
        self.results.iter().map(|r| r.chains.len()).sum()
    }

    /// Shortens every path of `chain` against `base`.
    pub(crate) fn shorten_chain(chain: &[String], base: Option<&Path>) -> Vec<String> {
        chain.iter().map(|p| shorten(p, base)).collect()
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the report to the given writer.
    fn export<W: Write>(&self, report: &ChainReport, writer: &mut W) -> io::Result<()>;
}

/// Export a report in the specified format.
pub fn export<W: Write>(
    format: ExportFormat,
    report: &ChainReport,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        ExportFormat::Text => text::TextExporter.export(report, writer),
        ExportFormat::Json => json::JsonExporter.export(report, writer),
        ExportFormat::Markdown => markdown::MarkdownExporter.export(report, writer),
    }
}

/// Export a report to a string.
pub fn export_to_string(format: ExportFormat, report: &ChainReport) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, report, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
