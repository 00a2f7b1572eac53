//! Configuration with multi-source loading.
//!
//! Merges built-in defaults, `ptg.toml` (or `--config <path>`) and `PTG_`
//! environment variables, in that order of increasing priority.

mod defaults;
mod loading;
mod registry;

use indexmap::IndexMap;
use ptg_graph::ExtractorFailurePolicy;
use ptg_llm::ProviderKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use defaults::*;
pub use registry::{ResolvedProject, ResolvedProvider};

/// Top-level configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PtgConfig {
    #[serde(default)]
    pub defaults: Defaults,

    /// Provider registry keyed by name.
    #[serde(default)]
    pub providers: IndexMap<String, ProviderEntry>,

    /// Project registry keyed by name.
    #[serde(default)]
    pub projects: IndexMap<String, ProjectEntry>,

    #[serde(default)]
    pub traversal: TraversalSettings,

    #[serde(default)]
    pub workflow: WorkflowSettings,
}

/// Selections used when the command line leaves them out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_project")]
    pub project: String,
}

/// One `[providers.<name>]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderEntry {
    #[serde(default)]
    pub kind: ProviderKind,

    pub base_url: String,

    /// Environment variable holding the API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    pub model: String,

    /// Model that writes source skeletons in `ptg workflow`; defaults to `model`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preprocess_model: Option<String>,

    #[serde(default)]
    pub temperature: f32,

    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// One `[projects.<name>]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectEntry {
    /// Name used for the output directory.
    pub project_name: String,

    /// Module root, e.g. `.../entry`.
    pub project_path: PathBuf,

    /// Path of `main_pages.json`.
    pub main_pages_path: PathBuf,

    /// Source root; defaults to `<project_path>/src/main/ets`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ets_root: Option<PathBuf>,
}

impl ProjectEntry {
    pub fn ets_root(&self) -> PathBuf {
        self.ets_root
            .clone()
            .unwrap_or_else(|| self.project_path.join("src").join("main").join("ets"))
    }
}

/// The `[traversal]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraversalSettings {
    #[serde(default = "default_max_files")]
    pub max_files: usize,

    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    #[serde(default = "default_max_route_files")]
    pub max_route_files: usize,

    #[serde(default = "default_max_route_file_chars")]
    pub max_route_file_chars: usize,

    /// 0 disables the per-file timeout.
    #[serde(default = "default_extract_timeout_seconds")]
    pub extract_timeout_seconds: u64,

    #[serde(default)]
    pub on_extractor_error: ExtractorFailurePolicy,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

/// The `[workflow]` table, used by `ptg workflow`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowSettings {
    /// Character budget per context chunk.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Replace each source file with a model-written skeleton first.
    #[serde(default = "default_preprocess")]
    pub preprocess: bool,

    #[serde(default = "default_prompt_dir")]
    pub prompt_dir: PathBuf,
}
