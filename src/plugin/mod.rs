//! Bundler plugin adapter.
//!
//! [`ImportChainPlugin`] follows a host bundler's build lifecycle:
//!
//! 1. [`setup`] at build start registers entry points and discards the
//!    previous build's graph.
//! 2. [`on_load`] runs for every file the host loads, scanning it for
//!    specifiers and recording one edge per resolved import.
//! 3. [`on_end`] merges the host's own dependency metadata and attaches
//!    import chain notes to every build error that names a file.
//!
//! The plugin never claims a resolve or load: both hooks return `None` so
//! the host proceeds as if the plugin were absent.
//!
//! [`setup`]: ImportChainPlugin::setup
//! [`on_load`]: ImportChainPlugin::on_load
//! [`on_end`]: ImportChainPlugin::on_end

pub mod host;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::bundle::DependencyMetadata;
use crate::config::{EntryPoints, TracerConfig};
use crate::format;
use crate::graph::{DependencyGraph, ImportChain, ImportEdge};
use crate::parser::{
    extractor_for, resolvable_specifiers, AnalysisError, AnalysisResult, SpecifierExtractor,
};
use crate::paths::{absolutize, path_key};
use crate::resolver::{probe, ModuleResolver, SpecifierKind};

pub use host::{BuildSummary, StandaloneHost};

/// What a resolve hook returns to claim a specifier.
///
/// Hosts treat `Some` as "this plugin decided where the specifier points"
/// and `None` as "ask the next plugin". [`ImportChainPlugin`] only observes
/// the build, so its hook always answers `None`; the type fixes the hook
/// signature a host dispatches on.
#[derive(Debug, Clone)]
pub struct ResolveIdResult {
    /// Resolved module ID (usually a file path).
    pub id: String,
    /// Whether this module is external (don't bundle).
    pub external: bool,
}

/// What a load hook returns to supply a module's contents instead of the
/// host reading the file. `None` leaves loading to the host.
#[derive(Debug, Clone)]
pub struct LoadResult {
    /// Module source code.
    pub code: String,
}

/// An error (or warning) reported by the host build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildMessage {
    pub text: String,
    /// File the message is about, as the host spells it
    pub file: Option<String>,
}

impl BuildMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            file: None,
        }
    }

    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

/// A build message with the notes the plugin attached to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: BuildMessage,
    pub notes: Vec<String>,
}

/// Import chain tracer wired into a bundler's lifecycle hooks.
pub struct ImportChainPlugin {
    config: TracerConfig,
    cwd: PathBuf,
    graph: DependencyGraph,
    resolver: ModuleResolver,
    extractor: Box<dyn SpecifierExtractor>,
}

impl std::fmt::Debug for ImportChainPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImportChainPlugin")
            .field("cwd", &self.cwd)
            .field("nodes", &self.graph.node_count())
            .field("edges", &self.graph.edge_count())
            .finish_non_exhaustive()
    }
}

impl ImportChainPlugin {
    /// Creates a plugin from its configuration.
    ///
    /// A relative `cwd` in the configuration is made absolute against the
    /// process working directory here, once. Fails if that directory cannot
    /// be determined or the configured extractor cannot be built.
    pub fn new(config: TracerConfig) -> AnalysisResult<Self> {
        let cwd = config.working_dir().map_err(AnalysisError::WorkingDir)?;
        let extractor = extractor_for(config.extractor)?;

        let mut graph = DependencyGraph::with_cwd(cwd.clone());
        graph.set_track_external(config.track_external);
        graph.set_lookup_mode(config.lookup);

        Ok(Self {
            resolver: ModuleResolver::with_memo(config.memoize_resolution),
            config,
            cwd,
            graph,
            extractor,
        })
    }

    pub fn name(&self) -> &str {
        "import-chain"
    }

    pub fn config(&self) -> &TracerConfig {
        &self.config
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Build start: resets all state and registers `entry_points`.
    pub fn setup(&mut self, entry_points: &EntryPoints) {
        self.graph.clear();
        self.resolver.clear();

        for entry in entry_points.paths() {
            let key = self.entry_key(entry);
            debug!(entry = %key, "registering entry point");
            self.graph.register_entry_point(&key);
        }
    }

    /// Build start using the entry points from the configuration.
    pub fn setup_from_config(&mut self) {
        let entry_points = self.config.entry_points.clone();
        self.setup(&entry_points);
    }

    /// Absolute graph key for an entry point, probing suffixes if the
    /// literal path does not exist.
    fn entry_key(&self, entry: &str) -> String {
        let absolute = absolutize(Path::new(entry), &self.cwd);
        let resolved = if absolute.is_file() {
            absolute
        } else {
            probe(&absolute).unwrap_or(absolute)
        };
        path_key(&resolved)
    }

    /// Resolve hook. Never claims a specifier.
    pub fn on_resolve(
        &mut self,
        _specifier: &str,
        _importer: Option<&Path>,
    ) -> Option<ResolveIdResult> {
        None
    }

    /// Load hook: records the imports of `path`. Never supplies contents.
    ///
    /// A relative `path` is taken against the plugin's working directory.
    pub fn on_load(&mut self, path: &Path) -> Option<LoadResult> {
        let path = absolutize(path, &self.cwd);
        match fs::read_to_string(&path) {
            Ok(source) => {
                self.record_source(&path, &source);
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "could not read file, recording no imports");
            }
        }
        None
    }

    /// Async variant of [`on_load`](Self::on_load) for hosts running on tokio.
    #[cfg(feature = "async-host")]
    pub async fn on_load_async(&mut self, path: &Path) -> Option<LoadResult> {
        let path = absolutize(path, &self.cwd);
        match tokio::fs::read_to_string(&path).await {
            Ok(source) => {
                self.record_source(&path, &source);
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "could not read file, recording no imports");
            }
        }
        None
    }

    /// Scans `source` (the contents of `path`) and records its imports.
    ///
    /// # Returns
    ///
    /// The number of distinct modules `path` was recorded as importing.
    /// Specifiers that resolve to the same module count once.
    pub fn record_source(&mut self, path: &Path, source: &str) -> usize {
        let importer = absolutize(path, &self.cwd);
        let importer_key = path_key(&importer);
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let specifiers = resolvable_specifiers(self.extractor.as_mut(), source, extension);
        let mut recorded = HashSet::new();

        for specifier in specifiers {
            let imported = match self.resolver.resolve(&specifier, &importer) {
                Some(resolved) => path_key(&resolved),
                // Unresolved bare imports are externals; the graph drops
                // them unless external tracking is on.
                None if SpecifierKind::of(&specifier) == SpecifierKind::Bare => specifier,
                None => continue,
            };

            if self.graph.add_import_relation(&importer_key, &imported) {
                recorded.insert(imported);
            }
        }

        debug!(file = %importer_key, recorded = recorded.len(), "scanned file");
        recorded.len()
    }

    /// Merges edges from host metadata through the externality filter.
    ///
    /// # Returns
    ///
    /// The number of edges accepted.
    pub fn merge_metadata(&mut self, metadata: &dyn DependencyMetadata) -> usize {
        let mut merged = 0;
        for edge in metadata.import_edges() {
            let edge = edge.absolutized(&self.cwd);
            if self
                .graph
                .add_import_relation_with(&edge.importer, &edge.imported, ImportEdge::from_host())
            {
                merged += 1;
            }
        }
        debug!(merged, "merged host metadata edges");
        merged
    }

    /// Build end: merges metadata, then attaches chain notes to errors.
    ///
    /// Every error is returned as a diagnostic; those naming a file carry
    /// the formatted import chains for that file.
    pub fn on_end(
        &mut self,
        errors: &[BuildMessage],
        metadata: Option<&dyn DependencyMetadata>,
    ) -> Vec<Diagnostic> {
        if let Some(metadata) = metadata {
            self.merge_metadata(metadata);
        }

        info!(
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            errors = errors.len(),
            "build finished"
        );

        errors
            .iter()
            .map(|message| {
                let notes = match &message.file {
                    Some(file) => {
                        let chains = self.get_import_chains(file);
                        self.format_import_chains(std::slice::from_ref(&chains))
                    }
                    None => Vec::new(),
                };
                Diagnostic {
                    message: message.clone(),
                    notes,
                }
            })
            .collect()
    }

    /// Every import chain leading to `target`.
    pub fn get_import_chains(&self, target: &str) -> ImportChain {
        self.graph.get_import_chains(target)
    }

    /// Formats chains with the configured indent and limit.
    pub fn format_import_chains(&self, chains: &[ImportChain]) -> Vec<String> {
        format::format_import_chains(chains, &self.config.indent, self.config.chain_limit)
    }
}
