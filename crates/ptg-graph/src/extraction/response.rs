//! Layered decoding of free-text extractor answers.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::memory::RawEdge;

static FENCE_OPEN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)^```(?:\s*json)?\s*\n?").ok());
static FENCE_CLOSE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\n?```\s*$").ok());
static EMBEDDED_ARRAY: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\[\s*\{[\s\S]*?\}\s*\]").ok());

/// Which decoding step produced the edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseLayer {
    /// The whole answer was a JSON array.
    Strict,
    /// The answer was a JSON array inside a markdown code fence.
    Fenced,
    /// A JSON array was found embedded in surrounding prose.
    Embedded,
}

/// Why an answer yielded no edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// Nothing but whitespace (or an empty fence).
    Blank,
    /// Valid JSON, but not an array.
    NotAnArray,
    /// No JSON array could be recovered.
    Unparseable,
}

/// Result of decoding an extractor answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Parsed { layer: ParseLayer, edges: Vec<RawEdge> },
    Empty(EmptyReason),
}

impl ParseOutcome {
    pub fn into_edges(self) -> Vec<RawEdge> {
        match self {
            ParseOutcome::Parsed { edges, .. } => edges,
            ParseOutcome::Empty(_) => Vec::new(),
        }
    }

    pub fn layer(&self) -> Option<ParseLayer> {
        match self {
            ParseOutcome::Parsed { layer, .. } => Some(*layer),
            ParseOutcome::Empty(_) => None,
        }
    }
}

/// Decode an answer into raw edges.
///
/// Tries, in order: the answer as strict JSON, the answer with a markdown
/// fence removed, and the first embedded `[{...}]` array. Array items that
/// are not objects are dropped. Never fails; see [`ParseOutcome::Empty`].
///
/// ```
/// use ptg_graph::extraction::{ParseLayer, parse_response};
///
/// let outcome = parse_response("```json\n[{\"component_type\":\"Button\",\"target\":\"pages/A\"}]\n```");
/// assert_eq!(outcome.layer(), Some(ParseLayer::Fenced));
/// assert_eq!(outcome.into_edges().len(), 1);
/// ```
pub fn parse_response(text: &str) -> ParseOutcome {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return ParseOutcome::Empty(EmptyReason::Blank);
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return from_value(value, ParseLayer::Strict);
    }

    let unfenced = strip_json_fence(trimmed);
    if unfenced.is_empty() {
        return ParseOutcome::Empty(EmptyReason::Blank);
    }
    if unfenced != trimmed {
        if let Ok(value) = serde_json::from_str::<Value>(&unfenced) {
            return from_value(value, ParseLayer::Fenced);
        }
    }

    if let Some(re) = EMBEDDED_ARRAY.as_ref() {
        for found in re.find_iter(&unfenced) {
            if let Ok(value @ Value::Array(_)) = serde_json::from_str::<Value>(found.as_str()) {
                return from_value(value, ParseLayer::Embedded);
            }
        }
    }

    ParseOutcome::Empty(EmptyReason::Unparseable)
}

fn from_value(value: Value, layer: ParseLayer) -> ParseOutcome {
    match value {
        Value::Array(items) => ParseOutcome::Parsed {
            layer,
            edges: items.iter().filter_map(RawEdge::from_value).collect(),
        },
        _ => ParseOutcome::Empty(EmptyReason::NotAnArray),
    }
}

/// Remove a surrounding Markdown code fence (optionally tagged `json`) and trim.
pub fn strip_json_fence(text: &str) -> String {
    let mut out = text.to_string();
    if let Some(re) = FENCE_OPEN.as_ref() {
        out = re.replace(&out, "").into_owned();
    }
    if let Some(re) = FENCE_CLOSE.as_ref() {
        out = re.replace(&out, "").into_owned();
    }
    out.trim().to_string()
}
