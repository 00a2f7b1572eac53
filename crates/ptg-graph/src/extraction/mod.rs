//! Navigation extraction boundary.
//!
//! Reading a file and reporting its navigation calls is delegated to an
//! external capability, in practice a language model. The engine only sees the
//! [`NavigationExtractor`] trait: it hands over an [`ExtractionRequest`] and
//! gets back free text, which [`parse_response`] turns into raw edges.

mod response;

pub use response::{EmptyReason, ParseLayer, ParseOutcome, parse_response, strip_json_fence};

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Everything the extractor gets to see about one file.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionRequest {
    /// Path of the file being analyzed.
    pub file_path: String,
    /// Source text of the file.
    #[serde(skip)]
    pub code: String,
    /// Main page ids of the project, in manifest order.
    pub main_pages: Vec<String>,
    /// Files traversed from the main page down to this one.
    pub dependency_chain: Vec<String>,
    /// Local files this file imports.
    pub resolved_import_files: Vec<String>,
    /// `Symbol.Member` route constants known for the project.
    pub route_constant_map: IndexMap<String, String>,
}

/// Errors reported by a navigation extractor.
#[derive(Debug, thiserror::Error)]
pub enum ExtractorError {
    /// The capability failed to produce an answer.
    #[error("Navigation extraction failed: {message}")]
    Failed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The capability did not answer in time.
    #[error("Navigation extraction timed out after {seconds}s")]
    Timeout { seconds: u64 },
}

impl ExtractorError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Failed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Capability that reads one file and reports its navigation calls as text.
#[async_trait]
pub trait NavigationExtractor: Send + Sync {
    /// Return the raw answer for one file; expected to contain a JSON array of
    /// `{component_type, event, target}` records.
    async fn extract(&self, request: &ExtractionRequest) -> Result<String, ExtractorError>;

    /// Short label for logs.
    fn name(&self) -> &str {
        "extractor"
    }
}

/// What the engine does when the extractor returns an error.
///
/// Timeouts always degrade to an empty result, whatever the policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorFailurePolicy {
    /// Log the failure and treat the file as contributing no edges.
    #[default]
    Skip,
    /// Stop the run.
    Abort,
}

impl std::str::FromStr for ExtractorFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "abort" => Ok(Self::Abort),
            other => Err(format!(
                "unknown extractor failure policy '{other}' (expected 'skip' or 'abort')"
            )),
        }
    }
}
