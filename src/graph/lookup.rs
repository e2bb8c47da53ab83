//! Matching a query target against graph keys.
//!
//! Callers such as error reporters hand over whatever path form they have:
//! absolute, `./`-relative, or cwd-relative. The graph stores absolute
//! normalized keys, so the target is tried in several spellings before
//! giving up.

use petgraph::graph::NodeIndex;
use serde::Deserialize;
use std::path::Path;

use super::DependencyGraph;
use crate::paths::{absolutize, basename, normalize, path_key};

/// How a chain query target is matched to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupMode {
    /// Exact key match on the normalized spellings, then the first node
    /// whose key ends with the target or shares its basename.
    ///
    /// The fallback can pick the wrong file when several share a basename.
    #[default]
    Heuristic,
    /// Exact key match on the normalized spellings only.
    Strict,
}

impl std::str::FromStr for LookupMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "heuristic" => Ok(Self::Heuristic),
            "strict" => Ok(Self::Strict),
            _ => Err(format!(
                "Unknown lookup mode: '{}'. Valid modes: heuristic, strict",
                s
            )),
        }
    }
}

impl DependencyGraph {
    /// Finds the node a query target refers to.
    ///
    /// Candidates are tried in order: the literal string, its absolute form,
    /// its normalized form, the string without a leading `./`, and the
    /// absolute form of that stripped string.
    pub(crate) fn find_target(&self, target: &str) -> Option<NodeIndex> {
        if target.is_empty() {
            return None;
        }

        if let Some(idx) = self
            .target_candidates(target)
            .iter()
            .find_map(|candidate| self.index_of(candidate))
        {
            return Some(idx);
        }

        match self.lookup_mode() {
            LookupMode::Strict => None,
            LookupMode::Heuristic => self.scan_for_target(target),
        }
    }

    fn target_candidates(&self, target: &str) -> Vec<String> {
        let cwd = self.cwd();
        let stripped = target.strip_prefix("./").unwrap_or(target);

        vec![
            target.to_string(),
            path_key(&absolutize(Path::new(target), cwd)),
            path_key(&normalize(Path::new(target))),
            stripped.to_string(),
            path_key(&absolutize(Path::new(stripped), cwd)),
        ]
    }

    /// First node, in creation order, whose key ends with the target or
    /// whose basename equals the target's basename.
    fn scan_for_target(&self, target: &str) -> Option<NodeIndex> {
        let target_base = basename(target);

        self.node_index_iter().find(|&idx| {
            let key = self.node_path(idx);
            key.ends_with(target) || (!target_base.is_empty() && basename(key) == target_base)
        })
    }
}
