//! chainscope - import dependency graph builder and chain tracer
//!
//! This crate answers "why is this file in my bundle?" for JavaScript and
//! TypeScript builds. It scans the files a bundler loads, resolves their
//! imports the way Node-style bundlers do, and records a file-level import
//! graph. When a build error names a file, the graph yields every chain of
//! imports leading from an entry point to that file.
//!
//! # Example
//!
//! ```
//! use chainscope::format::format_import_chains;
//! use chainscope::graph::DependencyGraph;
//!
//! let mut graph = DependencyGraph::with_cwd("/proj");
//! graph.register_entry_point("/proj/entry.js");
//! graph.add_import_relation("/proj/entry.js", "/proj/a.js");
//! graph.add_import_relation("/proj/a.js", "/proj/b.js");
//!
//! let chains = graph.get_import_chains("/proj/b.js");
//! let notes = format_import_chains(&[chains], "", None);
//! assert_eq!(notes[0], "note: Import chain:\n    ./entry.js => \n    ./a.js => \n    ./b.js");
//! ```

pub mod bundle;
pub mod config;
pub mod export;
pub mod format;
pub mod graph;
pub mod parser;
pub mod paths;
pub mod plugin;
pub mod resolver;
