//! Import graph implementation using petgraph.
//!
//! Provides a directed graph of source files keyed by absolute path. An
//! edge points from the importing file to the imported file, so a node's
//! outgoing edges are its `imports` and its incoming edges are its
//! `imported_by` set. Both directions are views of the same edge, which
//! keeps the two sets symmetric by construction.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use super::lookup::LookupMode;
use crate::paths::{has_node_modules_segment, is_absolute, is_relative};

/// Where an import edge was learned from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EdgeSource {
    /// Found by scanning the importer's source text during the load hook.
    #[default]
    Scanned,
    /// Merged from the host bundler's own dependency metadata at build end.
    HostMetadata,
}

impl std::fmt::Display for EdgeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scanned => write!(f, "scanned"),
            Self::HostMetadata => write!(f, "host-metadata"),
        }
    }
}

/// A file in the import graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    /// Absolute, normalized path (or raw specifier for tracked externals)
    pub path: String,
}

impl GraphNode {
    /// Creates a new node for the given path.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// Metadata stored on an import edge.
#[derive(Debug, Clone, Default)]
pub struct ImportEdge {
    /// How the edge was discovered
    pub source: EdgeSource,
}

impl ImportEdge {
    /// Creates an edge found by source scanning.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an edge merged from host metadata.
    pub fn from_host() -> Self {
        Self {
            source: EdgeSource::HostMetadata,
        }
    }
}

/// Returns true if `path` refers to code outside the local project tree.
///
/// A path is external when it has a `node_modules` segment, or when it is
/// neither absolute nor relative, which means it is a bare specifier that
/// never became a file path.
///
/// # Example
///
/// ```rust
/// use chainscope::graph::is_external_path;
///
/// assert!(is_external_path("/proj/node_modules/react/index.js"));
/// assert!(is_external_path("react"));
/// assert!(!is_external_path("/proj/src/app.ts"));
/// assert!(!is_external_path("./src/app.ts"));
/// ```
pub fn is_external_path(path: &str) -> bool {
    has_node_modules_segment(path) || (!is_absolute(path) && !is_relative(path))
}

/// A directed graph of import relations between source files.
///
/// Nodes are created lazily the first time a path is referenced and are
/// never removed during a build. The graph only grows until [`clear`]
/// is called at the start of the next build.
///
/// [`clear`]: DependencyGraph::clear
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
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.imports("/proj/a.js"), vec!["/proj/b.js"]);
/// assert_eq!(graph.imported_by("/proj/a.js"), vec!["/proj/entry.js"]);
/// ```
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// The underlying directed graph
    graph: DiGraph<GraphNode, ImportEdge>,
    /// Maps paths to their node indices for O(1) lookup
    node_indices: HashMap<String, NodeIndex>,
    /// Entry points in registration order
    entry_points: Vec<String>,
    entry_set: HashSet<String>,
    /// Whether edges to external modules become nodes
    track_external: bool,
    /// How chain queries match a target against node keys
    lookup: LookupMode,
    /// Base directory for resolving relative query targets
    cwd: PathBuf,
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl DependencyGraph {
    /// Creates an empty graph rooted at the process working directory.
    pub fn new() -> Self {
        Self::with_cwd(std::env::current_dir().unwrap_or_default())
    }

    /// Creates an empty graph that resolves relative query targets against `cwd`.
    pub fn with_cwd(cwd: impl Into<PathBuf>) -> Self {
        Self {
            graph: DiGraph::new(),
            node_indices: HashMap::new(),
            entry_points: Vec::new(),
            entry_set: HashSet::new(),
            track_external: false,
            lookup: LookupMode::default(),
            cwd: cwd.into(),
        }
    }

    /// Enables or disables external-module tracking.
    pub fn set_track_external(&mut self, track: bool) {
        self.track_external = track;
    }

    /// Returns true if edges to external modules are recorded.
    pub fn tracks_external(&self) -> bool {
        self.track_external
    }

    /// Sets how chain queries match targets to nodes.
    pub fn set_lookup_mode(&mut self, lookup: LookupMode) {
        self.lookup = lookup;
    }

    /// Returns the active lookup mode.
    pub fn lookup_mode(&self) -> LookupMode {
        self.lookup
    }

    /// Base directory used for relative query targets.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Ensures a node exists for `path`.
    ///
    /// Idempotent: an existing node is returned unchanged.
    ///
    /// # Returns
    ///
    /// The `NodeIndex` of the added or existing node.
    pub fn ensure_node(&mut self, path: &str) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(path) {
            return idx;
        }

        let idx = self.graph.add_node(GraphNode::new(path));
        self.node_indices.insert(path.to_string(), idx);
        idx
    }

    /// Records that `importer` imports `imported`.
    ///
    /// When external tracking is off and `imported` is external, nothing is
    /// recorded and no node is created. Recording the same relation twice
    /// leaves a single edge.
    ///
    /// # Returns
    ///
    /// `true` if the relation is present in the graph after the call.
    ///
    /// # Example
    ///
    /// ```rust
    /// use chainscope::graph::DependencyGraph;
    ///
    /// let mut graph = DependencyGraph::with_cwd("/proj");
    /// assert!(graph.add_import_relation("/proj/a.js", "/proj/b.js"));
    /// assert!(!graph.add_import_relation("/proj/a.js", "/proj/node_modules/x/index.js"));
    /// assert_eq!(graph.node_count(), 2);
    /// ```
    pub fn add_import_relation(&mut self, importer: &str, imported: &str) -> bool {
        self.add_import_relation_with(importer, imported, ImportEdge::new())
    }

    /// Records an import relation with custom edge metadata.
    ///
    /// An existing edge keeps its original metadata.
    pub fn add_import_relation_with(
        &mut self,
        importer: &str,
        imported: &str,
        edge: ImportEdge,
    ) -> bool {
        if !self.track_external && is_external_path(imported) {
            return false;
        }

        let from_idx = self.ensure_node(importer);
        let to_idx = self.ensure_node(imported);

        if self.graph.find_edge(from_idx, to_idx).is_none() {
            self.graph.add_edge(from_idx, to_idx, edge);
        }
        true
    }

    /// Registers `path` as an entry point and ensures it has a node.
    pub fn register_entry_point(&mut self, path: &str) {
        self.ensure_node(path);
        if self.entry_set.insert(path.to_string()) {
            self.entry_points.push(path.to_string());
        }
    }

    /// Returns true if `path` was registered as an entry point.
    pub fn is_entry_point(&self, path: &str) -> bool {
        self.entry_set.contains(path)
    }

    /// Entry points in registration order.
    pub fn entry_points(&self) -> &[String] {
        &self.entry_points
    }

    /// Gets a node by its path key.
    pub fn get_node(&self, path: &str) -> Option<&GraphNode> {
        self.node_indices
            .get(path)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    /// Paths that `path` imports, in the order the relations were recorded.
    ///
    /// Returns an empty vector for unknown paths.
    pub fn imports(&self, path: &str) -> Vec<&str> {
        let Some(&idx) = self.node_indices.get(path) else {
            return Vec::new();
        };
        self.neighbor_indices(idx, Direction::Outgoing)
            .into_iter()
            .map(|n| self.graph[n].path.as_str())
            .collect()
    }

    /// Paths that import `path`, in the order the relations were recorded.
    ///
    /// Returns an empty vector for unknown paths.
    pub fn imported_by(&self, path: &str) -> Vec<&str> {
        let Some(&idx) = self.node_indices.get(path) else {
            return Vec::new();
        };
        self.neighbor_indices(idx, Direction::Incoming)
            .into_iter()
            .map(|n| self.graph[n].path.as_str())
            .collect()
    }

    /// Returns how an edge was discovered, if it exists.
    pub fn edge_source(&self, importer: &str, imported: &str) -> Option<EdgeSource> {
        let from = *self.node_indices.get(importer)?;
        let to = *self.node_indices.get(imported)?;
        let edge = self.graph.find_edge(from, to)?;
        self.graph.edge_weight(edge).map(|e| e.source)
    }

    /// Gets all nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.graph.node_weights()
    }

    /// Returns the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of import relations in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Checks if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Checks if a node exists for the exact path key.
    pub fn contains(&self, path: &str) -> bool {
        self.node_indices.contains_key(path)
    }

    /// Drops every node, edge, and entry point. Settings are kept.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.node_indices.clear();
        self.entry_points.clear();
        self.entry_set.clear();
    }

    pub(crate) fn index_of(&self, path: &str) -> Option<NodeIndex> {
        self.node_indices.get(path).copied()
    }

    pub(crate) fn node_path(&self, idx: NodeIndex) -> &str {
        &self.graph[idx].path
    }

    pub(crate) fn node_index_iter(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Neighbors sorted by edge index, which is insertion order.
    pub(crate) fn neighbor_indices(&self, idx: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut edges: Vec<_> = self.graph.edges_directed(idx, direction).collect();
        edges.sort_by_key(|edge| edge.id());
        edges
            .into_iter()
            .map(|edge| match direction {
                Direction::Outgoing => edge.target(),
                Direction::Incoming => edge.source(),
            })
            .collect()
    }
}
