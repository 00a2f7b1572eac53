//! Traversal engine.
//!
//! For each main page the engine walks the page file and every local
//! component it imports, depth first, asking the navigation extractor about
//! each file once. Edges found anywhere below a main page are attributed to
//! that main page. The walk is bounded by a global file budget and a maximum
//! import depth; hitting either bound truncates the result silently.

mod output;
mod traversal;

pub use output::{OUTPUT_FILE_PREFIX, ptg_output_path};

use rustc_hash::FxHashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::dependency_chain::DependencyGraph;
use crate::extraction::{ExtractorError, ExtractorFailurePolicy, NavigationExtractor};
use crate::imports::ModuleResolver;
use crate::manifest::{ManifestError, load_main_pages};
use crate::memory::PtgMemory;
use crate::paths::{ensure_source_ext, path_key, strip_source_ext};
use crate::route_constants::{RouteConstants, ScanLimits, scan_route_constants};
use crate::runtime::Runtime;

/// Error that can occur during a run.
#[derive(Debug, thiserror::Error)]
pub enum WalkerError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("Navigation extraction failed for '{path}': {source}")]
    ExtractionFailed {
        path: PathBuf,
        #[source]
        source: ExtractorError,
    },

    #[error("Failed to write PTG to '{path}': {source}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: crate::Error,
    },
}

/// Resource bounds of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalLimits {
    /// Files analyzed across the whole run.
    pub max_files: usize,
    /// Import depth below a main page; 0 analyzes only the page itself.
    pub max_depth: usize,
    /// Candidate files inspected by the route-constant scanner.
    pub max_route_files: usize,
    /// Characters read from each route-constant candidate.
    pub max_route_file_chars: usize,
}

impl Default for TraversalLimits {
    fn default() -> Self {
        Self {
            max_files: 2000,
            max_depth: 30,
            max_route_files: 120,
            max_route_file_chars: 40_000,
        }
    }
}

/// Inputs of one extraction run.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    pub project_name: String,
    pub main_pages_path: PathBuf,
    /// Source root; page files and rooted import specifiers live below it.
    pub ets_root: PathBuf,
    pub output_dir: PathBuf,
    pub limits: TraversalLimits,
    /// Per-file bound on the extractor call. `None` waits indefinitely.
    pub extract_timeout: Option<Duration>,
    pub failure_policy: ExtractorFailurePolicy,
}

impl WalkerConfig {
    pub fn new(
        project_name: impl Into<String>,
        main_pages_path: impl Into<PathBuf>,
        ets_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            main_pages_path: main_pages_path.into(),
            ets_root: ets_root.into(),
            output_dir: PathBuf::from("result"),
            limits: TraversalLimits::default(),
            extract_timeout: Some(Duration::from_secs(120)),
            failure_policy: ExtractorFailurePolicy::default(),
        }
    }
}

/// Counters collected during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub files_analyzed: usize,
    pub edges_added: usize,
    pub pages_skipped: usize,
}

/// Result of [`TraversalEngine::run`].
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub memory: PtgMemory,
    pub dependency_graph: DependencyGraph,
    pub output_path: PathBuf,
    pub stats: RunStats,
}

/// Drives the extraction for one project.
pub struct TraversalEngine {
    config: WalkerConfig,
    runtime: Arc<dyn Runtime>,
    extractor: Arc<dyn NavigationExtractor>,
    resolver: ModuleResolver,
    memory: PtgMemory,
    constants: RouteConstants,
    dependency_graph: DependencyGraph,
    visited: FxHashSet<String>,
    stats: RunStats,
}

impl TraversalEngine {
    pub fn new(
        config: WalkerConfig,
        runtime: Arc<dyn Runtime>,
        extractor: Arc<dyn NavigationExtractor>,
    ) -> Self {
        let resolver = ModuleResolver::new(config.ets_root.clone());
        Self {
            config,
            runtime,
            extractor,
            resolver,
            memory: PtgMemory::new(),
            constants: RouteConstants::new(),
            dependency_graph: DependencyGraph::new(),
            visited: FxHashSet::default(),
            stats: RunStats::default(),
        }
    }

    pub fn config(&self) -> &WalkerConfig {
        &self.config
    }

    pub fn memory(&self) -> &PtgMemory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut PtgMemory {
        &mut self.memory
    }

    pub fn route_constants(&self) -> &RouteConstants {
        &self.constants
    }

    pub fn dependency_graph(&self) -> &DependencyGraph {
        &self.dependency_graph
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// Scan the source root for route tables and share them with the memory.
    pub async fn load_route_constants(&mut self) {
        let limits = ScanLimits {
            max_files: self.config.limits.max_route_files,
            max_chars_per_file: self.config.limits.max_route_file_chars,
        };
        self.constants =
            scan_route_constants(self.runtime.as_ref(), &self.config.ets_root, &limits).await;
        self.memory
            .update_route_constants(self.constants.full(), self.constants.short());
    }

    /// Run the whole extraction and persist the graph.
    pub async fn run(mut self) -> Result<RunOutcome, WalkerError> {
        let main_pages =
            load_main_pages(self.runtime.as_ref(), &self.config.main_pages_path).await?;
        let page_ids: Vec<String> = main_pages.iter().map(|p| strip_source_ext(p)).collect();

        let mut seeded: Vec<String> = page_ids.iter().filter(|id| !id.is_empty()).cloned().collect();
        seeded.sort();
        seeded.dedup();
        self.memory.init_from_main_pages(&seeded);

        self.load_route_constants().await;

        let prompt_pages: Vec<String> = page_ids.iter().filter(|id| !id.is_empty()).cloned().collect();
        for (raw, page_id) in main_pages.iter().zip(&page_ids) {
            if page_id.is_empty() {
                continue;
            }

            let page_file = self.config.ets_root.join(ensure_source_ext(raw));
            if !self.runtime.exists(&page_file) {
                warn!("Main page file not found: {}", page_file.display());
                self.stats.pages_skipped += 1;
                continue;
            }

            self.analyze_page(page_id, &page_file, &prompt_pages).await?;
        }

        let timestamp = chrono::Local::now().naive_local();
        let output_path =
            ptg_output_path(&self.config.output_dir, &self.config.project_name, &timestamp);
        self.memory
            .save_json(self.runtime.as_ref(), &output_path)
            .await
            .map_err(|source| WalkerError::WriteOutput {
                path: output_path.clone(),
                source,
            })?;
        info!("PTG saved: {}", path_key(&output_path));

        Ok(RunOutcome {
            memory: self.memory,
            dependency_graph: self.dependency_graph,
            output_path,
            stats: self.stats,
        })
    }
}
