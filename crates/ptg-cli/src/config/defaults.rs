use indexmap::IndexMap;
use ptg_llm::ProviderKind;
use std::path::PathBuf;

use crate::config::{Defaults, ProviderEntry, PtgConfig, TraversalSettings, WorkflowSettings};

pub const DEFAULT_PROVIDER: &str = "deepseek";
pub const DEFAULT_PROJECT: &str = "HarmoneyOpenEye";
pub const CONFIG_FILE_NAME: &str = "ptg.toml";
pub const ENV_PREFIX: &str = "PTG_";

pub fn default_provider() -> String {
    DEFAULT_PROVIDER.to_string()
}

pub fn default_project() -> String {
    DEFAULT_PROJECT.to_string()
}

pub fn default_timeout_seconds() -> u64 {
    120
}

pub fn default_max_files() -> usize {
    2000
}

pub fn default_max_depth() -> usize {
    30
}

pub fn default_max_route_files() -> usize {
    120
}

pub fn default_max_route_file_chars() -> usize {
    40_000
}

pub fn default_extract_timeout_seconds() -> u64 {
    120
}

pub fn default_output_dir() -> PathBuf {
    PathBuf::from("result")
}

pub fn default_chunk_size() -> usize {
    ptg_llm::workflow::DEFAULT_CHUNK_SIZE
}

pub fn default_preprocess() -> bool {
    true
}

pub fn default_prompt_dir() -> PathBuf {
    PathBuf::from("prompt")
}

fn hosted(base_url: &str, api_key_env: &str, model: &str) -> ProviderEntry {
    ProviderEntry {
        kind: ProviderKind::OpenAiCompatible,
        base_url: base_url.to_string(),
        api_key_env: Some(api_key_env.to_string()),
        model: model.to_string(),
        preprocess_model: None,
        temperature: 0.0,
        timeout_seconds: default_timeout_seconds(),
        max_tokens: None,
    }
}

/// Providers available without any configuration file.
pub fn builtin_providers() -> IndexMap<String, ProviderEntry> {
    let mut providers = IndexMap::new();
    providers.insert(
        "deepseek".to_string(),
        hosted("https://api.deepseek.com", "DEEPSEEK_API_KEY", "deepseek-chat"),
    );
    providers.insert(
        "glm".to_string(),
        hosted("https://open.bigmodel.cn/api/paas/v4/", "GLM_API_KEY", "glm-4.7"),
    );
    providers.insert(
        "doubao".to_string(),
        hosted(
            "https://ark.cn-beijing.volces.com/api/v3",
            "DOUBAO_API_KEY",
            "doubao-seed-1-8-251215",
        ),
    );
    providers.insert(
        "ollama".to_string(),
        ProviderEntry {
            kind: ProviderKind::Ollama,
            base_url: "http://localhost:11434".to_string(),
            api_key_env: None,
            model: "llama3.2:3b".to_string(),
            preprocess_model: None,
            temperature: 0.0,
            timeout_seconds: default_timeout_seconds(),
            max_tokens: None,
        },
    );
    providers
}

impl Default for TraversalSettings {
    fn default() -> Self {
        Self {
            max_files: default_max_files(),
            max_depth: default_max_depth(),
            max_route_files: default_max_route_files(),
            max_route_file_chars: default_max_route_file_chars(),
            extract_timeout_seconds: default_extract_timeout_seconds(),
            on_extractor_error: Default::default(),
            output_dir: default_output_dir(),
        }
    }
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            preprocess: default_preprocess(),
            prompt_dir: default_prompt_dir(),
        }
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            project: default_project(),
        }
    }
}

impl PtgConfig {
    /// Built-in defaults: the provider registry, traversal bounds and workflow
    /// settings; no projects.
    pub fn default_config() -> Self {
        Self {
            defaults: Defaults::default(),
            providers: builtin_providers(),
            projects: IndexMap::new(),
            traversal: TraversalSettings::default(),
            workflow: WorkflowSettings::default(),
        }
    }
}
