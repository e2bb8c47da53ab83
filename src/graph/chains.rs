//! Import chain tracing.
//!
//! Answers "why is this file in the build" by walking `imported_by` edges
//! upward from a target until a root is reached. Each walk records one
//! chain, stored root first.

use petgraph::graph::NodeIndex;
use petgraph::Direction;
use serde::Serialize;
use std::collections::HashSet;

use super::DependencyGraph;

/// Result of an import chain query.
///
/// `chains` lists every path found from a root down to `target`. When the
/// target could not be matched to any node, `found` is false and `chains`
/// is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportChain {
    /// The path that was queried, as given by the caller
    pub target: String,
    /// Paths from a root (first) to the target (last)
    pub chains: Vec<Vec<String>>,
    /// Whether the target matched a node in the graph
    pub found: bool,
}

impl ImportChain {
    /// Creates a result for a target that matched no node.
    pub fn not_found(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            chains: Vec::new(),
            found: false,
        }
    }

    /// Returns true if at least one chain was found.
    pub fn is_reachable(&self) -> bool {
        self.found && !self.chains.is_empty()
    }

    /// Gets the shortest chain (if any).
    pub fn shortest_chain(&self) -> Option<&[String]> {
        self.chains.iter().min_by_key(|c| c.len()).map(Vec::as_slice)
    }

    /// Distinct roots the chains start from, in discovery order.
    pub fn roots(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.chains
            .iter()
            .filter_map(|chain| chain.first())
            .filter(|root| seen.insert(root.as_str()))
            .map(String::as_str)
            .collect()
    }
}

/// Chains collected by one upward walk.
#[derive(Default)]
struct Walks {
    /// Chains starting at a node nothing imports
    rooted: Vec<Vec<String>>,
    /// Chains starting at a node whose importers were all on the walk
    closed: Vec<Vec<String>>,
}

impl DependencyGraph {
    /// Enumerates every import chain leading to `target`.
    ///
    /// The walk goes up `imported_by` edges depth-first. A node already on
    /// the current walk is not re-entered, so cycles terminate. Chains
    /// start at a root, a node nothing imports. When no root reaches the
    /// target, the result falls back to `[target]` if the target is an
    /// entry point, and otherwise to the chains that ended where every
    /// importer was already on the walk.
    ///
    /// # Example
    ///
    /// ```rust
    /// use chainscope::graph::DependencyGraph;
    ///
    /// let mut graph = DependencyGraph::with_cwd("/proj");
    /// graph.add_import_relation("/proj/entry.js", "/proj/a.js");
    /// graph.add_import_relation("/proj/a.js", "/proj/b.js");
    ///
    /// let result = graph.get_import_chains("/proj/b.js");
    /// assert!(result.found);
    /// assert_eq!(
    ///     result.chains,
    ///     vec![vec!["/proj/entry.js", "/proj/a.js", "/proj/b.js"]]
    /// );
    /// ```
    pub fn get_import_chains(&self, target: &str) -> ImportChain {
        let Some(start) = self.find_target(target) else {
            return ImportChain::not_found(target);
        };

        let mut walks = Walks::default();
        let mut on_walk = HashSet::new();
        let mut walk = Vec::new();
        self.walk_importers(start, &mut on_walk, &mut walk, &mut walks);

        let target_path = self.node_path(start);
        let chains = if !walks.rooted.is_empty() {
            walks.rooted
        } else if self.is_entry_point(target_path) {
            vec![vec![target_path.to_string()]]
        } else {
            walks.closed
        };

        ImportChain {
            target: target.to_string(),
            chains,
            found: true,
        }
    }

    fn walk_importers(
        &self,
        node: NodeIndex,
        on_walk: &mut HashSet<NodeIndex>,
        walk: &mut Vec<NodeIndex>,
        walks: &mut Walks,
    ) {
        on_walk.insert(node);
        walk.push(node);

        let importers = self.neighbor_indices(node, Direction::Incoming);
        let next: Vec<NodeIndex> = importers
            .iter()
            .copied()
            .filter(|importer| !on_walk.contains(importer))
            .collect();

        if next.is_empty() {
            let chain = walk
                .iter()
                .rev()
                .map(|&idx| self.node_path(idx).to_string())
                .collect();
            if importers.is_empty() {
                walks.rooted.push(chain);
            } else {
                walks.closed.push(chain);
            }
        } else {
            for importer in next {
                self.walk_importers(importer, on_walk, walk, walks);
            }
        }

        walk.pop();
        on_walk.remove(&node);
    }
}
