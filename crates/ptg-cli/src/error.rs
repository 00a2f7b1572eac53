//! Error handling for the `ptg` CLI.
//!
//! - `CliError` is the top-level type returned by commands
//! - `ConfigError` covers configuration loading and registry lookups, each
//!   variant carrying a hint the user can act on
//! - `ResultExt` prefixes any convertible error with context

pub mod miette;

use std::path::PathBuf;
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The traversal stopped before producing a graph.
    #[error("Extraction failed: {0}")]
    Walker(#[from] ptg_graph::WalkerError),

    #[error("Graph error: {0}")]
    Graph(#[from] ptg_graph::Error),

    /// The language-model provider could not be set up.
    #[error("LLM provider error: {0}")]
    Llm(#[from] ptg_llm::LlmError),

    /// The long-prompt workflow stopped before saving a result.
    #[error("Workflow failed: {0}")]
    Workflow(#[from] ptg_llm::WorkflowError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}\n\nHint: Create a ptg.toml file or pass --config <path>", .0.display())]
    NotFound(PathBuf),

    #[error("Unknown provider \"{name}\". Supported: {}\n\nHint: Add a [providers.{name}] table to ptg.toml", supported.join(", "))]
    UnknownProvider { name: String, supported: Vec<String> },

    #[error("Unknown project \"{name}\". Supported: {}\n\nHint: Add a [projects.{name}] table to ptg.toml", if supported.is_empty() { "none configured".to_string() } else { supported.join(", ") })]
    UnknownProject { name: String, supported: Vec<String> },

    #[error("Missing env {env}\n\nHint: Export {env} with your API key before running ptg")]
    MissingApiKey { env: String },

    #[error("Missing required field: {field}\n\nHint: {hint}")]
    MissingField { field: String, hint: String },

    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        field: String,
        value: String,
        hint: String,
    },
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Extension trait for adding context to `Result` types.
pub trait ResultExt<T> {
    /// Prefix the error message.
    fn context(self, msg: impl std::fmt::Display) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, msg: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{}: {}", msg, err))
        })
    }
}
