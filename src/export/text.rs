//! Plain text export, one diagnostic note per block.

use super::{ChainReport, Exporter};
use crate::format::format_import_chains;
use std::io::{self, Write};

/// Text exporter implementation.
pub struct TextExporter;

impl Exporter for TextExporter {
    fn export<W: Write>(&self, report: &ChainReport, writer: &mut W) -> io::Result<()> {
        for note in format_import_chains(&report.results, &report.indent, report.limit) {
            writeln!(writer, "{}", note)?;
        }
        Ok(())
    }
}
