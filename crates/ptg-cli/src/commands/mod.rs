//! Command implementations.

pub mod extract;
pub mod workflow;

pub use extract::execute as extract_execute;
pub use workflow::execute as workflow_execute;

use ptg_llm::{CompletionProvider, LlmConfig, OllamaClient, ProviderKind, build_provider};

use crate::error::Result;

/// Build a client for `config`. Ollama is checked for the model first.
pub(crate) async fn connect(config: LlmConfig) -> Result<Box<dyn CompletionProvider>> {
    match config.kind {
        ProviderKind::Ollama => {
            let client = OllamaClient::new(config)?;
            client.preflight_check().await?.into_result()?;
            Ok(Box::new(client))
        }
        ProviderKind::OpenAiCompatible => Ok(build_provider(config)?),
    }
}
