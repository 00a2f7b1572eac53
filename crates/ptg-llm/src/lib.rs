//! Language-model backends for page-transition extraction.
//!
//! [`LlmNavigationExtractor`] implements [`ptg_graph::NavigationExtractor`] on
//! top of any [`CompletionProvider`]. Two providers ship with the crate:
//!
//! - [`OpenAiCompatibleClient`]: `POST {base}/chat/completions` with bearer auth
//!   and retries (DeepSeek, GLM, Doubao and similar services)
//! - [`OllamaClient`]: a local Ollama server via `ollama-rs`
//!
//! [`workflow`] holds the alternative whole-project mode, which sends every
//! relevant source file to the model in one chunked conversation.
//!
//! ```no_run
//! use ptg_llm::{LlmConfig, LlmNavigationExtractor};
//!
//! let config = LlmConfig::openai_compatible("deepseek", "https://api.deepseek.com", "deepseek-chat")
//!     .with_api_key("sk-...");
//! let extractor = LlmNavigationExtractor::from_config(config)?;
//! # Ok::<(), ptg_llm::LlmError>(())
//! ```

pub mod config;
pub mod error;
pub mod extractor;
pub mod ollama;
pub mod openai;
pub mod prompts;
pub mod provider;
pub mod workflow;

pub use config::{LlmConfig, ProviderKind};
pub use error::{LlmError, Result};
pub use extractor::{LlmNavigationExtractor, build_provider};
pub use ollama::{OllamaClient, PreflightResult};
pub use openai::{OpenAiCompatibleClient, normalize_base_url};
pub use prompts::{SYSTEM_PROMPT, build_user_prompt};
pub use provider::{CompletionProvider, Message, Role};
pub use workflow::{LongPromptWorkflow, WorkflowConfig, WorkflowError, WorkflowOutcome};
