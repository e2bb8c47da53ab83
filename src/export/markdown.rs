//! Markdown export implementation.
//!
//! Exports chain query results in Markdown format for documentation and reporting.

use super::{ChainReport, Exporter};
use crate::format::shorten;
use std::io::{self, Write};

/// Markdown exporter implementation.
pub struct MarkdownExporter;

impl Exporter for MarkdownExporter {
    fn export<W: Write>(&self, report: &ChainReport, writer: &mut W) -> io::Result<()> {
        let base = report.base();

        // Title
        writeln!(writer, "# Import Chain Report")?;
        writeln!(writer)?;
        if let Some(base) = &base {
            writeln!(writer, "**Base:** `{}`", base.display())?;
            writeln!(writer)?;
        }

        // Summary section
        writeln!(writer, "## Summary")?;
        writeln!(writer)?;
        writeln!(writer, "| Metric | Count |")?;
        writeln!(writer, "|--------|-------|")?;
        writeln!(writer, "| Targets | {} |", report.results.len())?;
        writeln!(writer, "| Reachable | {} |", report.reachable_count())?;
        writeln!(writer, "| Chains | {} |", report.chain_count())?;
        writeln!(writer)?;

        // One section per target
        for result in &report.results {
            writeln!(writer, "## `{}`", shorten(&result.target, base.as_deref()))?;
            writeln!(writer)?;

            if !result.is_reachable() {
                writeln!(writer, "No import chain found.")?;
                writeln!(writer)?;
                continue;
            }

            for (i, chain) in result.chains.iter().enumerate() {
                let rendered = ChainReport::shorten_chain(chain, base.as_deref())
                    .iter()
                    .map(|p| format!("`{}`", p))
                    .collect::<Vec<_>>()
                    .join(" → ");
                writeln!(writer, "{}. {}", i + 1, rendered)?;
            }
            writeln!(writer)?;
        }

        // Footer
        writeln!(writer, "---")?;
        writeln!(writer, "*Generated by chainscope*")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ImportChain;

    fn create_test_report() -> ChainReport {
        ChainReport::new(vec![
            ImportChain {
                target: "/app/lib/util.js".into(),
                chains: vec![
                    vec!["/app/index.js".into(), "/app/lib/util.js".into()],
                    vec![
                        "/app/worker.js".into(),
                        "/app/lib/queue.js".into(),
                        "/app/lib/util.js".into(),
                    ],
                ],
                found: true,
            },
            ImportChain::not_found("/app/lib/orphan.js"),
        ])
    }

    fn export_markdown(report: &ChainReport) -> String {
        let mut output = Vec::new();
        MarkdownExporter.export(report, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_markdown_export_header() {
        let md = export_markdown(&create_test_report());

        assert!(md.contains("# Import Chain Report"));
        assert!(md.contains("**Base:** `/app`"));
        assert!(md.contains("| Targets | 2 |"));
        assert!(md.contains("| Reachable | 1 |"));
        assert!(md.contains("| Chains | 2 |"));
    }

    #[test]
    fn test_markdown_export_numbered_chains() {
        let md = export_markdown(&create_test_report());

        assert!(md.contains("## `./lib/util.js`"));
        assert!(md.contains("1. `./index.js` → `./lib/util.js`"));
        assert!(md.contains("2. `./worker.js` → `./lib/queue.js` → `./lib/util.js`"));
    }

    #[test]
    fn test_markdown_export_not_found() {
        let md = export_markdown(&create_test_report());

        assert!(md.contains("## `./lib/orphan.js`"));
        assert!(md.contains("No import chain found."));
        assert!(md.contains("*Generated by chainscope*"));
    }
}
