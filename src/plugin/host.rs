//! Standalone host that drives the plugin without a bundler.
//!
//! Loads files the way a bundler would: starting at the entry points and
//! following every import the plugin recorded, breadth first. Directories
//! given with [`StandaloneHost::with_scan_dir`] are walked as well, so
//! files no entry point reaches still appear in the graph.

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use super::{BuildMessage, Diagnostic, ImportChainPlugin};
use crate::bundle::DependencyMetadata;
use crate::parser::is_scanned_extension;
use crate::paths::{absolutize, path_key};

/// Counts reported after a build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub files_loaded: usize,
    pub nodes: usize,
    pub edges: usize,
    pub entry_points: usize,
}

impl std::fmt::Display for BuildSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "loaded {} files: {} modules, {} imports, {} entry points",
            self.files_loaded, self.nodes, self.edges, self.entry_points
        )
    }
}

/// Drives an [`ImportChainPlugin`] through one build.
#[derive(Debug)]
pub struct StandaloneHost {
    plugin: ImportChainPlugin,
    scan_dirs: Vec<PathBuf>,
}

impl StandaloneHost {
    pub fn new(plugin: ImportChainPlugin) -> Self {
        Self {
            plugin,
            scan_dirs: Vec::new(),
        }
    }

    /// Also load every source file under `dir`.
    #[must_use]
    pub fn with_scan_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scan_dirs.push(dir.into());
        self
    }

    pub fn plugin(&self) -> &ImportChainPlugin {
        &self.plugin
    }

    /// Runs build start and the load phase.
    pub fn build(&mut self) -> BuildSummary {
        self.plugin.setup_from_config();

        let mut queue: VecDeque<String> =
            self.plugin.graph().entry_points().iter().cloned().collect();
        for dir in &self.scan_dirs {
            let dir = absolutize(dir, self.plugin.cwd());
            queue.extend(source_files(&dir).iter().map(|p| path_key(p)));
        }

        let mut loaded: HashSet<String> = HashSet::new();
        let mut files_loaded = 0;
        while let Some(file) = queue.pop_front() {
            if !loaded.insert(file.clone()) {
                continue;
            }
            let path = Path::new(&file);
            if !path.is_file() || !has_scanned_extension(path) {
                continue;
            }

            self.plugin.on_load(path);
            files_loaded += 1;
            queue.extend(
                self.plugin
                    .graph()
                    .imports(&file)
                    .into_iter()
                    .filter(|imported| !loaded.contains(*imported))
                    .map(str::to_string),
            );
        }

        let graph = self.plugin.graph();
        let summary = BuildSummary {
            files_loaded,
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            entry_points: graph.entry_points().len(),
        };
        info!(%summary, "build complete");
        summary
    }

    /// Merges host metadata ahead of [`finish`](Self::finish).
    pub fn merge_metadata(&mut self, metadata: &dyn DependencyMetadata) -> usize {
        self.plugin.merge_metadata(metadata)
    }

    /// Runs build end with the given errors and optional host metadata.
    pub fn finish(
        &mut self,
        errors: &[BuildMessage],
        metadata: Option<&dyn DependencyMetadata>,
    ) -> Vec<Diagnostic> {
        self.plugin.on_end(errors, metadata)
    }
}

fn has_scanned_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(is_scanned_extension)
}

/// All scanned source files under `root`, skipping build output and
/// dependency directories.
pub fn source_files(root: &Path) -> Vec<PathBuf> {
    let files: Vec<PathBuf> = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_ignored_dir(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| has_scanned_extension(p))
        .collect();
    debug!(root = %root.display(), files = files.len(), "scanned directory");
    files
}

/// Check if a directory should be ignored during traversal.
fn is_ignored_dir(entry: &walkdir::DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }

    let name = entry.file_name().to_string_lossy();
    matches!(
        name.as_ref(),
        "node_modules" | ".git" | "dist" | "build" | ".next" | "coverage" | ".turbo"
    )
}
