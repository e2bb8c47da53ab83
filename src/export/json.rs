//! JSON export implementation.
//!
//! Exports chain query results in JSON format for machine-readable output.

use super::{ChainReport, Exporter};
use serde::Serialize;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

/// Serializable target result for JSON output.
#[derive(Serialize)]
struct JsonTarget<'a> {
    target: &'a str,
    found: bool,
    chains: &'a [Vec<String>],
    short_chains: Vec<Vec<String>>,
}

/// Summary statistics for JSON output.
#[derive(Serialize)]
struct JsonSummary {
    targets: usize,
    reachable: usize,
    chains: usize,
}

/// Root JSON export structure.
#[derive(Serialize)]
struct JsonExport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    base: Option<String>,
    summary: JsonSummary,
    results: Vec<JsonTarget<'a>>,
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, report: &ChainReport, writer: &mut W) -> io::Result<()> {
        let base = report.base();

        let results: Vec<JsonTarget> = report
            .results
            .iter()
            .map(|r| JsonTarget {
                target: &r.target,
                found: r.found,
                chains: &r.chains,
                short_chains: r
                    .chains
                    .iter()
                    .map(|c| ChainReport::shorten_chain(c, base.as_deref()))
                    .collect(),
            })
            .collect();

        let export = JsonExport {
            base: base.as_ref().map(|b| b.to_string_lossy().into_owned()),
            summary: JsonSummary {
                targets: report.results.len(),
                reachable: report.reachable_count(),
                chains: report.chain_count(),
            },
            results,
        };

        let json = serde_json::to_string_pretty(&export)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}
