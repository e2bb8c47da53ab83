//! Graph module for import relationship modeling.
//!
//! This module provides the [`DependencyGraph`] struct, a bidirectional
//! file-level import graph, and the chain queries run against it.
//!
//! # Example
//!
//! ```rust
//! use chainscope::graph::DependencyGraph;
//!
//! let mut graph = DependencyGraph::with_cwd("/proj");
//! graph.add_import_relation("/proj/entry.js", "/proj/a.js");
//! graph.add_import_relation("/proj/a.js", "/proj/b.js");
//!
//! let result = graph.get_import_chains("b.js");
//! assert!(result.found);
//! assert_eq!(result.chains[0].len(), 3);
//! ```

mod chains;
mod dependency_graph;
mod lookup;

pub use chains::ImportChain;
pub use dependency_graph::{is_external_path, DependencyGraph, EdgeSource, GraphNode, ImportEdge};
pub use lookup::LookupMode;
