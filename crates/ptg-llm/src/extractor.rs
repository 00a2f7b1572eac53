//! Adapter that lets the traversal engine drive a completion provider.

use crate::config::{LlmConfig, ProviderKind};
use crate::error::{LlmError, Result};
use crate::ollama::OllamaClient;
use crate::openai::OpenAiCompatibleClient;
use crate::prompts::{SYSTEM_PROMPT, build_user_prompt};
use crate::provider::CompletionProvider;
use async_trait::async_trait;
use ptg_graph::{ExtractionRequest, ExtractorError, NavigationExtractor};

/// Build the client matching `config.kind`.
pub fn build_provider(config: LlmConfig) -> Result<Box<dyn CompletionProvider>> {
    match config.kind {
        ProviderKind::OpenAiCompatible => Ok(Box::new(OpenAiCompatibleClient::new(config)?)),
        ProviderKind::Ollama => Ok(Box::new(OllamaClient::new(config)?)),
    }
}

/// [`NavigationExtractor`] backed by a language model.
pub struct LlmNavigationExtractor {
    provider: Box<dyn CompletionProvider>,
    label: String,
}

impl LlmNavigationExtractor {
    pub fn new(provider: Box<dyn CompletionProvider>) -> Self {
        let label = format!("{}/{}", provider.provider_name(), provider.model_name());
        Self { provider, label }
    }

    pub fn from_config(config: LlmConfig) -> Result<Self> {
        Ok(Self::new(build_provider(config)?))
    }
}

impl std::fmt::Debug for LlmNavigationExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmNavigationExtractor")
            .field("label", &self.label)
            .finish()
    }
}

#[async_trait]
impl NavigationExtractor for LlmNavigationExtractor {
    async fn extract(
        &self,
        request: &ExtractionRequest,
    ) -> std::result::Result<String, ExtractorError> {
        let user = build_user_prompt(request);
        tracing::debug!(
            file = %request.file_path,
            prompt_chars = user.chars().count(),
            "Sending extraction prompt to {}",
            self.label
        );

        match self.provider.complete(SYSTEM_PROMPT, &user).await {
            Ok(answer) => Ok(answer),
            Err(LlmError::Timeout { seconds }) => Err(ExtractorError::Timeout { seconds }),
            Err(err) => Err(ExtractorError::with_source(
                format!("{} could not analyze {}", self.label, request.file_path),
                err,
            )),
        }
    }

    fn name(&self) -> &str {
        &self.label
    }
}
