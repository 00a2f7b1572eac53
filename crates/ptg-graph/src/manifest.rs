//! Main-pages manifest loading.
//!
//! HarmonyOS projects list their routable pages in `main_pages.json`, either
//! as `{"src": [...]}`, as `{"pages": [...]}`, or as a bare array.

use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::runtime::{Runtime, RuntimeError, read_text};

/// Errors loading the main-pages manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to read main pages manifest '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: RuntimeError,
    },

    #[error("Main pages manifest '{path}' is not valid JSON: {source}")]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "Unsupported main pages manifest format in '{path}': expected {{\"src\": [...]}}, {{\"pages\": [...]}} or a list"
    )]
    UnsupportedFormat { path: PathBuf },
}

/// Load the ordered list of main page paths. Blank entries are dropped.
pub async fn load_main_pages(
    runtime: &dyn Runtime,
    path: &Path,
) -> Result<Vec<String>, ManifestError> {
    let text = read_text(runtime, path)
        .await
        .map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let value: Value =
        serde_json::from_str(&text).map_err(|source| ManifestError::InvalidJson {
            path: path.to_path_buf(),
            source,
        })?;

    parse_main_pages(&value).ok_or_else(|| ManifestError::UnsupportedFormat {
        path: path.to_path_buf(),
    })
}

/// Extract the page list from an already parsed manifest.
pub fn parse_main_pages(value: &Value) -> Option<Vec<String>> {
    let list = match value {
        Value::Array(items) => items,
        Value::Object(object) => match (object.get("src"), object.get("pages")) {
            (Some(Value::Array(items)), _) => items,
            (_, Some(Value::Array(items))) => items,
            _ => return None,
        },
        _ => return None,
    };

    Some(
        list.iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .filter(|page| !page.trim().is_empty())
            .collect(),
    )
}
