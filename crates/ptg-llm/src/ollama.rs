//! Client for a local Ollama server.

use crate::config::LlmConfig;
use crate::error::{LlmError, Result};
use crate::provider::CompletionProvider;
use async_trait::async_trait;
use ollama_rs::{Ollama, generation::completion::request::GenerationRequest, models::ModelOptions};
use std::time::Duration;

/// Client for interacting with Ollama.
#[derive(Debug)]
pub struct OllamaClient {
    client: Ollama,
    config: LlmConfig,
}

impl OllamaClient {
    /// Creates a new Ollama client.
    pub fn new(config: LlmConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|message| LlmError::InvalidConfig { message })?;

        let url = config.base_url.trim().trim_end_matches('/');
        let url = if url.contains("://") {
            url.to_string()
        } else {
            format!("http://{url}")
        };

        let client = Ollama::try_new(url.as_str()).map_err(|e| LlmError::InvalidConfig {
            message: format!("Invalid Ollama URL '{url}': {e}"),
        })?;

        Ok(Self { client, config })
    }

    /// Checks that Ollama is running and the model is pulled.
    pub async fn preflight_check(&self) -> Result<PreflightResult> {
        let models = self
            .client
            .list_local_models()
            .await
            .map_err(|e| LlmError::ServiceUnreachable {
                url: self.config.base_url.clone(),
                source: Box::new(e),
            })?;

        let available: Vec<String> = models.into_iter().map(|m| m.name).collect();
        if has_model(&available, &self.config.model) {
            Ok(PreflightResult::Ok {
                model: self.config.model.clone(),
                available_models: available,
            })
        } else {
            Ok(PreflightResult::ModelNotFound {
                requested: self.config.model.clone(),
                available,
            })
        }
    }

    fn options(&self) -> ModelOptions {
        let options = ModelOptions::default().temperature(self.config.temperature);
        match self.config.max_tokens {
            Some(max) => options.num_predict(i32::try_from(max).unwrap_or(i32::MAX)),
            None => options,
        }
    }
}

fn has_model(available: &[String], model: &str) -> bool {
    available
        .iter()
        .any(|name| name == model || name.strip_prefix(model).is_some_and(|tag| tag.starts_with(':')))
}

#[async_trait]
impl CompletionProvider for OllamaClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let request = GenerationRequest::new(self.config.model.clone(), user)
            .system(system)
            .options(self.options());

        match tokio::time::timeout(
            Duration::from_secs(self.config.timeout_seconds),
            self.client.generate(request),
        )
        .await
        {
            Ok(Ok(response)) => Ok(response.response),
            Ok(Err(e)) => Err(LlmError::GenerationFailed {
                message: format!("Ollama generation error: {e}"),
                source: Some(Box::new(e)),
            }),
            Err(_) => Err(LlmError::Timeout {
                seconds: self.config.timeout_seconds,
            }),
        }
    }

    fn provider_name(&self) -> &str {
        &self.config.name
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Result of a preflight check.
#[derive(Debug)]
pub enum PreflightResult {
    /// Everything is ready.
    Ok {
        model: String,
        available_models: Vec<String>,
    },

    /// Ollama is running but the model is missing.
    ModelNotFound {
        requested: String,
        available: Vec<String>,
    },
}

impl PreflightResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, PreflightResult::Ok { .. })
    }

    /// Converts to an error if not OK.
    pub fn into_result(self) -> Result<()> {
        match self {
            PreflightResult::Ok { .. } => Ok(()),
            PreflightResult::ModelNotFound {
                requested,
                available,
            } => Err(LlmError::ModelNotFound {
                model: requested,
                available_models: available,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_matching_accepts_tags() {
        let available = vec!["llama3.2:3b".to_string(), "qwen2.5-coder:latest".to_string()];
        assert!(has_model(&available, "llama3.2:3b"));
        assert!(has_model(&available, "qwen2.5-coder"));
        assert!(!has_model(&available, "qwen2.5"));
        assert!(!has_model(&[], "llama3.2"));
    }

    #[test]
    fn test_client_accepts_bare_host() {
        let client = OllamaClient::new(LlmConfig::ollama("localhost:11434", "llama3.2:3b")).unwrap();
        assert_eq!(client.model_name(), "llama3.2:3b");
        assert_eq!(client.provider_name(), "ollama");
    }

    #[test]
    fn test_config_validation_in_client() {
        let result = OllamaClient::new(LlmConfig::ollama("http://localhost:11434", ""));
        assert!(matches!(result, Err(LlmError::InvalidConfig { .. })));
    }

    #[test]
    fn test_preflight_into_result() {
        let missing = PreflightResult::ModelNotFound {
            requested: "llama3.2".into(),
            available: vec![],
        };
        assert!(!missing.is_ok());
        let err = missing.into_result().unwrap_err();
        assert!(err.to_string().contains("ollama pull llama3.2"));
    }
}
