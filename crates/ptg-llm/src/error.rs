//! Error types for completion providers.

use std::fmt;

/// Result type for LLM operations.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Errors that can occur while talking to a completion provider.
#[derive(Debug)]
pub enum LlmError {
    /// The configuration cannot produce a working client.
    InvalidConfig { message: String },

    /// The provider endpoint could not be reached.
    ServiceUnreachable {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Requested model is not available on the Ollama instance.
    ModelNotFound {
        model: String,
        available_models: Vec<String>,
    },

    /// The provider answered with a non-success HTTP status.
    Status {
        provider: String,
        status: u16,
        body: String,
    },

    /// Generation failed for another reason.
    GenerationFailed {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The provider answered, but not in the expected shape.
    InvalidResponse {
        message: String,
        raw_response: String,
    },

    /// Request timeout.
    Timeout { seconds: u64 },

    /// JSON serialization/deserialization error.
    Json(serde_json::Error),
}

impl LlmError {
    /// Whether repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::ServiceUnreachable { .. } | LlmError::Timeout { .. } => true,
            LlmError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

fn preview(text: &str) -> String {
    match text.char_indices().nth(100) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmError::InvalidConfig { message } => {
                write!(f, "Invalid LLM configuration: {message}")
            }
            LlmError::ServiceUnreachable { url, source } => {
                write!(f, "Cannot reach completion service at {url}: {source}")
            }
            LlmError::ModelNotFound {
                model,
                available_models,
            } => {
                write!(
                    f,
                    "Model '{model}' not found. Available models: {}\n\
                     To download: ollama pull {model}",
                    if available_models.is_empty() {
                        "none (install a model first)".to_string()
                    } else {
                        available_models.join(", ")
                    }
                )
            }
            LlmError::Status {
                provider,
                status,
                body,
            } => {
                write!(f, "{provider} API error ({status}): {}", preview(body))
            }
            LlmError::GenerationFailed { message, .. } => {
                write!(f, "LLM generation failed: {message}")
            }
            LlmError::InvalidResponse {
                message,
                raw_response,
            } => {
                write!(
                    f,
                    "Invalid LLM response: {message}\nResponse preview: {}",
                    preview(raw_response)
                )
            }
            LlmError::Timeout { seconds } => {
                write!(f, "LLM request timed out after {seconds}s")
            }
            LlmError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl std::error::Error for LlmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LlmError::ServiceUnreachable { source, .. } => {
                Some(&**source as &dyn std::error::Error)
            }
            LlmError::GenerationFailed {
                source: Some(source),
                ..
            } => Some(&**source as &dyn std::error::Error),
            LlmError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::Json(err)
    }
}
