//! Configuration types for completion providers.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Wire protocol spoken by a provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    /// `POST {base_url}/chat/completions` with bearer authentication.
    #[default]
    OpenAiCompatible,
    /// A local Ollama server.
    Ollama,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::OpenAiCompatible => write!(f, "openai-compatible"),
            ProviderKind::Ollama => write!(f, "ollama"),
        }
    }
}

/// Resolved settings for one provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Display name used in logs and errors (e.g. "deepseek").
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default)]
    pub kind: ProviderKind,

    /// Endpoint base URL.
    pub base_url: String,

    /// Secret sent as a bearer token; unused by Ollama.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    pub model: String,

    /// Sampling temperature (0.0-2.0); 0 keeps answers deterministic.
    #[serde(default)]
    pub temperature: f32,

    /// Upper bound on generated tokens, if the provider should enforce one.
    #[serde(default)]
    pub max_tokens: Option<u32>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Extra attempts after a retryable failure.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl LlmConfig {
    /// An OpenAI-compatible provider.
    pub fn openai_compatible(
        name: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: ProviderKind::OpenAiCompatible,
            base_url: base_url.into(),
            api_key: None,
            model: model.into(),
            temperature: 0.0,
            max_tokens: None,
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
        }
    }

    /// A local Ollama server.
    pub fn ollama(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            kind: ProviderKind::Ollama,
            ..Self::openai_compatible("ollama", base_url, model)
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Longest one completion can take: every attempt timing out, plus the
    /// back-off sleeps between attempts. Ollama requests are not retried.
    pub fn worst_case_duration(&self) -> Duration {
        let per_request = Duration::from_secs(self.timeout_seconds);
        match self.kind {
            ProviderKind::Ollama => per_request,
            ProviderKind::OpenAiCompatible => (1..=self.max_retries)
                .map(retry_delay)
                .fold(per_request * (self.max_retries + 1), |total, delay| total + delay),
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("Model name cannot be empty".to_string());
        }

        if self.base_url.trim().is_empty() {
            return Err("Base URL cannot be empty".to_string());
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "Temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            ));
        }

        if self.max_tokens == Some(0) {
            return Err("max_tokens must be greater than 0".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("timeout_seconds must be greater than 0".to_string());
        }

        if self.kind == ProviderKind::OpenAiCompatible
            && self.api_key.as_deref().is_none_or(|key| key.trim().is_empty())
        {
            return Err(format!("Provider '{}' requires an API key", self.name));
        }

        Ok(())
    }
}

/// Sleep before retry number `attempt` (1-based): 1s, 2s, 4s, ... capped at 32s.
pub(crate) fn retry_delay(attempt: u32) -> Duration {
    Duration::from_secs(1 << attempt.saturating_sub(1).min(5))
}

// Default value functions for serde
fn default_name() -> String {
    "openai-compatible".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_max_retries() -> u32 {
    2
}
