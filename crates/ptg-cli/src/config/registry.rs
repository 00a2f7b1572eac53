//! Provider and project lookups.

use crate::config::{ProjectEntry, ProviderEntry, PtgConfig};
use crate::error::ConfigError;
use ptg_graph::{TraversalLimits, WalkerConfig};
use ptg_llm::{LlmConfig, ProviderKind, WorkflowConfig};
use std::time::Duration;

/// A provider selected by name.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedProvider<'a> {
    /// Registry key as written in the configuration.
    pub name: &'a str,
    pub entry: &'a ProviderEntry,
}

/// A project selected by name.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedProject<'a> {
    pub name: &'a str,
    pub entry: &'a ProjectEntry,
}

impl PtgConfig {
    /// Look a provider up case-insensitively.
    pub fn provider(&self, name: &str) -> Result<ResolvedProvider<'_>, ConfigError> {
        let wanted = name.trim().to_lowercase();
        self.providers
            .iter()
            .find(|(key, _)| key.to_lowercase() == wanted)
            .map(|(key, entry)| ResolvedProvider { name: key, entry })
            .ok_or_else(|| ConfigError::UnknownProvider {
                name: name.trim().to_string(),
                supported: self.providers.keys().cloned().collect(),
            })
    }

    /// Look a project up by exact name, then case-insensitively.
    pub fn project(&self, name: &str) -> Result<ResolvedProject<'_>, ConfigError> {
        let wanted = name.trim();
        let found = self.projects.get_key_value(wanted).or_else(|| {
            let lower = wanted.to_lowercase();
            self.projects
                .iter()
                .find(|(key, _)| key.to_lowercase() == lower)
        });

        found
            .map(|(key, entry)| ResolvedProject { name: key, entry })
            .ok_or_else(|| ConfigError::UnknownProject {
                name: wanted.to_string(),
                supported: self.projects.keys().cloned().collect(),
            })
    }

    /// Project named on the command line, or the configured default.
    pub fn select_project(&self, requested: Option<&str>) -> Result<ResolvedProject<'_>, ConfigError> {
        self.project(requested.unwrap_or(&self.defaults.project))
    }

    /// Build the walker inputs for a project.
    ///
    /// The per-file timeout is raised to cover every retry of `llm`, so a slow
    /// first attempt cannot cut off the provider's own retries.
    pub fn walker_config(&self, project: &ResolvedProject<'_>, llm: &LlmConfig) -> WalkerConfig {
        let traversal = &self.traversal;
        let mut config = WalkerConfig::new(
            project.entry.project_name.clone(),
            project.entry.main_pages_path.clone(),
            project.entry.ets_root(),
        );
        config.output_dir = traversal.output_dir.clone();
        config.limits = TraversalLimits {
            max_files: traversal.max_files,
            max_depth: traversal.max_depth,
            max_route_files: traversal.max_route_files,
            max_route_file_chars: traversal.max_route_file_chars,
        };
        config.extract_timeout = (traversal.extract_timeout_seconds > 0).then(|| {
            let configured = Duration::from_secs(traversal.extract_timeout_seconds);
            let needed = llm.worst_case_duration();
            if needed > configured {
                tracing::debug!(
                    configured = configured.as_secs(),
                    needed = needed.as_secs(),
                    "Raising extract timeout to cover provider retries"
                );
            }
            configured.max(needed)
        });
        config.failure_policy = traversal.on_extractor_error;
        config
    }

    /// Build the long-prompt workflow inputs for a project.
    pub fn workflow_config(&self, project: &ResolvedProject<'_>) -> WorkflowConfig {
        let mut config = WorkflowConfig::new(
            project.entry.project_name.clone(),
            project.entry.main_pages_path.clone(),
            project.entry.ets_root(),
        );
        config.chunk_size = self.workflow.chunk_size;
        config.preprocess = self.workflow.preprocess;
        config.prompt_dir = self.workflow.prompt_dir.clone();
        config.output_dir = self.traversal.output_dir.clone();
        config
    }
}

impl ResolvedProvider<'_> {
    /// Build a client configuration, reading the API key through `lookup_env`.
    pub fn llm_config(
        &self,
        lookup_env: impl Fn(&str) -> Option<String>,
    ) -> Result<LlmConfig, ConfigError> {
        let entry = self.entry;
        let api_key = match (&entry.api_key_env, entry.kind) {
            (Some(env), _) => {
                let key = lookup_env(env)
                    .filter(|value| !value.trim().is_empty())
                    .ok_or_else(|| ConfigError::MissingApiKey { env: env.clone() })?;
                Some(key)
            }
            (None, ProviderKind::OpenAiCompatible) => {
                return Err(ConfigError::MissingField {
                    field: format!("providers.{}.api_key_env", self.name),
                    hint: "Name the environment variable that holds the API key".to_string(),
                });
            }
            (None, ProviderKind::Ollama) => None,
        };

        let config = LlmConfig {
            name: self.name.to_string(),
            kind: entry.kind,
            base_url: entry.base_url.clone(),
            api_key,
            model: entry.model.clone(),
            temperature: entry.temperature,
            max_tokens: entry.max_tokens,
            timeout_seconds: entry.timeout_seconds,
            ..LlmConfig::openai_compatible(self.name, &entry.base_url, &entry.model)
        };

        config.validate().map_err(|hint| ConfigError::InvalidValue {
            field: format!("providers.{}", self.name),
            value: entry.model.clone(),
            hint,
        })?;
        Ok(config)
    }

    /// Client configuration for skeleton writing, when it uses a different
    /// model than `main`.
    pub fn preprocess_config(&self, main: &LlmConfig) -> Option<LlmConfig> {
        self.entry
            .preprocess_model
            .as_deref()
            .map(str::trim)
            .filter(|model| !model.is_empty() && *model != main.model)
            .map(|model| LlmConfig {
                model: model.to_string(),
                ..main.clone()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PtgConfig {
        PtgConfig::from_toml_str(
            r#"
            [projects.HarmoneyOpenEye]
            project_name = "HarmoneyOpenEye"
            project_path = "/p/eye/entry"
            main_pages_path = "/p/eye/entry/main_pages.json"

            [projects.harmoneyopeneye]
            project_name = "lowercase twin"
            project_path = "/p/twin"
            main_pages_path = "/p/twin/main_pages.json"

            [projects.Biandan]
            project_name = "Biandan"
            project_path = "/p/biandan/entry"
            main_pages_path = "/p/biandan/entry/main_pages.json"
            ets_root = "/p/biandan/entry/ets"

            [traversal]
            extract_timeout_seconds = 0
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_provider_lookup_is_case_insensitive() {
        let config = config();
        assert_eq!(config.provider("DeepSeek").unwrap().name, "deepseek");
        assert_eq!(config.provider(" GLM ").unwrap().name, "glm");

        match config.provider("openai") {
            Err(ConfigError::UnknownProvider { name, supported }) => {
                assert_eq!(name, "openai");
                assert_eq!(supported.len(), 4);
                assert!(supported.iter().any(|s| s == "doubao"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_project_lookup_prefers_exact_match() {
        let config = config();
        assert_eq!(
            config.project("harmoneyopeneye").unwrap().entry.project_name,
            "lowercase twin"
        );
        assert_eq!(config.project("BIANDAN").unwrap().name, "Biandan");
        assert!(matches!(
            config.project("Nope"),
            Err(ConfigError::UnknownProject { .. })
        ));
    }

    #[test]
    fn test_project_selection_falls_back_to_default() {
        let config = config();
        assert_eq!(
            config.select_project(None).unwrap().name,
            "HarmoneyOpenEye"
        );
        assert_eq!(config.select_project(Some("Biandan")).unwrap().name, "Biandan");

        let empty = PtgConfig::default_config();
        match empty.select_project(None) {
            Err(ConfigError::UnknownProject { name, supported }) => {
                assert_eq!(name, "HarmoneyOpenEye");
                assert!(supported.is_empty());
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    fn ollama_llm() -> LlmConfig {
        LlmConfig::ollama("http://localhost:11434", "llama3.2:3b")
    }

    #[test]
    fn test_walker_config_from_project() {
        let config = config();
        let project = config.project("Biandan").unwrap();
        let walker = config.walker_config(&project, &ollama_llm());

        assert_eq!(walker.project_name, "Biandan");
        assert_eq!(walker.ets_root, std::path::PathBuf::from("/p/biandan/entry/ets"));
        assert_eq!(walker.limits.max_depth, 30);
        assert_eq!(walker.extract_timeout, None);
    }

    #[test]
    fn test_extract_timeout_covers_provider_retries() {
        let config = PtgConfig::from_toml_str(
            r#"
            [projects.Demo]
            project_name = "Demo"
            project_path = "/p/demo"
            main_pages_path = "/p/demo/main_pages.json"
            "#,
        )
        .unwrap();
        let project = config.project("Demo").unwrap();
        let llm = config
            .provider("deepseek")
            .unwrap()
            .llm_config(|_| Some("sk".to_string()))
            .unwrap();

        let walker = config.walker_config(&project, &llm);
        let timeout = walker.extract_timeout.unwrap();
        assert!(timeout >= llm.worst_case_duration());
        assert!(timeout > Duration::from_secs(llm.timeout_seconds * 3));

        let quick = ollama_llm().with_timeout(10);
        assert_eq!(
            config.walker_config(&project, &quick).extract_timeout,
            Some(Duration::from_secs(120))
        );
    }

    #[test]
    fn test_workflow_config_from_project() {
        let config = config();
        let project = config.project("Biandan").unwrap();
        let workflow = config.workflow_config(&project);

        assert_eq!(workflow.project_name, "Biandan");
        assert_eq!(workflow.ets_root, std::path::PathBuf::from("/p/biandan/entry/ets"));
        assert_eq!(workflow.chunk_size, 1500);
        assert!(workflow.preprocess);
        assert_eq!(workflow.output_dir, std::path::PathBuf::from("result"));
    }

    #[test]
    fn test_preprocess_config_only_for_a_different_model() {
        let config = PtgConfig::from_toml_str(
            r#"
            [providers.glm]
            preprocess_model = "glm-4-flash"

            [providers.doubao]
            preprocess_model = "doubao-seed-1-8-251215"
            "#,
        )
        .unwrap();
        let key = |_: &str| Some("secret".to_string());

        let glm = config.provider("glm").unwrap();
        let main = glm.llm_config(key).unwrap();
        let skeleton = glm.preprocess_config(&main).unwrap();
        assert_eq!(skeleton.model, "glm-4-flash");
        assert_eq!(skeleton.api_key.as_deref(), Some("secret"));

        let doubao = config.provider("doubao").unwrap();
        let main = doubao.llm_config(key).unwrap();
        assert!(doubao.preprocess_config(&main).is_none());

        let deepseek = config.provider("deepseek").unwrap();
        let main = deepseek.llm_config(key).unwrap();
        assert!(deepseek.preprocess_config(&main).is_none());
    }

    #[test]
    fn test_missing_api_key() {
        let config = config();
        let provider = config.provider("doubao").unwrap();

        let err = provider.llm_config(|_| None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey { ref env } if env == "DOUBAO_API_KEY"));

        let err = provider.llm_config(|_| Some("  ".into())).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey { .. }));
    }

    #[test]
    fn test_llm_config_from_entry() {
        let config = config();
        let llm = config
            .provider("glm")
            .unwrap()
            .llm_config(|env| (env == "GLM_API_KEY").then(|| "secret".to_string()))
            .unwrap();

        assert_eq!(llm.name, "glm");
        assert_eq!(llm.model, "glm-4.7");
        assert_eq!(llm.api_key.as_deref(), Some("secret"));
        assert_eq!(llm.temperature, 0.0);

        let ollama = config.provider("ollama").unwrap().llm_config(|_| None).unwrap();
        assert_eq!(ollama.kind, ProviderKind::Ollama);
        assert!(ollama.api_key.is_none());
    }
}
