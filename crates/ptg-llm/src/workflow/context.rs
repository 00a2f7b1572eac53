//! Source context: which files go into the long prompt and how they are packed.

use ptg_graph::paths::{normalize_slashes, path_key};
use ptg_graph::runtime::{Runtime, RuntimeResult, read_text};
use regex::Regex;
use serde::Serialize;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Instant;
use tracing::{info, warn};

use crate::provider::{CompletionProvider, Message};
use crate::workflow::prompts::preprocess_prompt;

/// Path fragments that mark a source file as relevant to navigation.
const TARGET_FRAGMENTS: [&str; 6] = ["pages", "route", "viewModel", "formview", "view", "components"];

/// Characters charged per file on top of its path and code.
pub const CHUNK_ITEM_OVERHEAD: usize = 64;

static CODE_FENCE_OPEN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)^```(?:typescript|ts)?\s*").ok());
static CODE_FENCE_CLOSE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\s*```$").ok());

/// One source file as it appears in the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextFile {
    /// Path relative to the ets root, with forward slashes.
    pub path: String,
    pub code: String,
}

/// Whether a path below the ets root belongs in the prompt.
///
/// ```
/// use ptg_llm::workflow::is_target_ets;
///
/// assert!(is_target_ets("pages/Index.ets"));
/// assert!(is_target_ets("common\\components\\Card.ets"));
/// assert!(!is_target_ets("entryability/EntryAbility.ets"));
/// assert!(!is_target_ets("pages/Index.ts"));
/// ```
pub fn is_target_ets(relative_path: &str) -> bool {
    let path = normalize_slashes(relative_path);
    path.ends_with(".ets") && TARGET_FRAGMENTS.iter().any(|fragment| path.contains(fragment))
}

/// Read every target file below `ets_root`, in directory-walk order.
///
/// Blank files are left out.
pub async fn scan_sources(runtime: &dyn Runtime, ets_root: &Path) -> RuntimeResult<Vec<ContextFile>> {
    let mut files = Vec::new();
    for path in runtime.list_files(ets_root)? {
        let Ok(relative) = path.strip_prefix(ets_root) else {
            continue;
        };
        let relative = path_key(relative);
        if !is_target_ets(&relative) {
            continue;
        }

        let code = read_text(runtime, &path).await?;
        if !code.trim().is_empty() {
            files.push(ContextFile {
                path: relative,
                code,
            });
        }
    }
    Ok(files)
}

/// Ask `provider` for a navigation skeleton of `code`.
///
/// Never fails: a provider error is returned as a `// [PREPROCESS ERROR]`
/// comment so the file still occupies its place in the context.
pub async fn preprocess_source(provider: &dyn CompletionProvider, code: &str) -> String {
    if code.trim().is_empty() {
        return String::new();
    }

    let started = Instant::now();
    match provider.chat(&[Message::user(preprocess_prompt(code))]).await {
        Ok(text) => {
            let skeleton = strip_code_fence(&text);
            info!(
                model = provider.model_name(),
                input_chars = code.chars().count(),
                output_chars = skeleton.chars().count(),
                duration_ms = started.elapsed().as_millis() as u64,
                "Preprocessed source file"
            );
            skeleton
        }
        Err(err) => {
            warn!(model = provider.model_name(), error = %err, "Preprocessing failed");
            format!("// [PREPROCESS ERROR] {err}")
        }
    }
}

fn strip_code_fence(text: &str) -> String {
    if !text.contains("```") {
        return text.to_string();
    }
    let mut out = text.to_string();
    if let Some(re) = CODE_FENCE_OPEN.as_ref() {
        out = re.replace(&out, "").trim().to_string();
    }
    if let Some(re) = CODE_FENCE_CLOSE.as_ref() {
        out = re.replace(&out, "").trim().to_string();
    }
    out
}

/// Pack files into JSON arrays of `{path, code}` without splitting a file.
///
/// A chunk is closed before the file that would push it past `max_chars`; a
/// single oversized file still gets a chunk of its own.
pub fn chunk_context(files: &[ContextFile], max_chars: usize) -> serde_json::Result<Vec<String>> {
    let mut chunks: Vec<Vec<&ContextFile>> = Vec::new();
    let mut current: Vec<&ContextFile> = Vec::new();
    let mut current_chars = 0;

    for file in files {
        let item_chars = file.path.chars().count() + file.code.chars().count() + CHUNK_ITEM_OVERHEAD;
        if !current.is_empty() && current_chars + item_chars > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_chars = 0;
        }
        current.push(file);
        current_chars += item_chars;
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    chunks.iter().map(serde_json::to_string).collect()
}
