//! Edge records stored in the graph.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder used when the trigger component or event is unknown.
pub const UNKNOWN: &str = "unknown";

/// The UI component that triggers a navigation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentRef {
    #[serde(rename = "type")]
    pub kind: String,
}

/// One navigation transition out of a main page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub component: ComponentRef,
    pub event: String,
    pub target: String,
}

/// De-duplication identity of an edge within one page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeKey {
    pub component_type: String,
    pub event: String,
    pub target: String,
}

impl Edge {
    pub fn new(
        component_type: impl Into<String>,
        event: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            component: ComponentRef {
                kind: component_type.into(),
            },
            event: event.into(),
            target: target.into(),
        }
    }

    pub fn component_type(&self) -> &str {
        &self.component.kind
    }

    pub fn key(&self) -> EdgeKey {
        EdgeKey {
            component_type: self.component.kind.clone(),
            event: self.event.clone(),
            target: self.target.clone(),
        }
    }
}

/// An edge as reported by the extractor, before normalization.
///
/// Every field is optional; defaults are applied when the edge is added to
/// the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEdge {
    pub component_type: Option<String>,
    pub event: Option<String>,
    pub target: Option<String>,
}

impl RawEdge {
    pub fn new(
        component_type: impl Into<String>,
        event: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            component_type: Some(component_type.into()),
            event: Some(event.into()),
            target: Some(target.into()),
        }
    }

    /// Read a loosely shaped JSON record.
    ///
    /// The component may be given as `{"component": {"type": ..}}` or as a flat
    /// `component_type` field; the nested form wins when both are present.
    /// Returns `None` when the value is not an object.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;

        let component_type = object
            .get("component")
            .and_then(|component| component.get("type"))
            .and_then(scalar_text)
            .or_else(|| object.get("component_type").and_then(scalar_text));

        Some(Self {
            component_type,
            event: object.get("event").and_then(scalar_text),
            target: object.get("target").and_then(scalar_text),
        })
    }
}

/// Non-empty textual form of a scalar JSON value.
fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.trim().is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn edge_serializes_with_nested_component() {
        let edge = Edge::new("Button", "onClick", "pages/Detail");
        assert_eq!(
            serde_json::to_value(&edge).unwrap(),
            json!({"component": {"type": "Button"}, "event": "onClick", "target": "pages/Detail"})
        );
    }

    #[test]
    fn raw_edge_accepts_both_component_shapes() {
        let flat = RawEdge::from_value(&json!({
            "component_type": "Button", "event": "onClick", "target": "pages/A"
        }))
        .unwrap();
        assert_eq!(flat.component_type.as_deref(), Some("Button"));

        let nested = RawEdge::from_value(&json!({
            "component": {"type": "ListItem"}, "component_type": "Ignored", "target": "pages/B"
        }))
        .unwrap();
        assert_eq!(nested.component_type.as_deref(), Some("ListItem"));
        assert_eq!(nested.event, None);
    }

    #[test]
    fn raw_edge_ignores_blank_and_structured_fields() {
        let raw = RawEdge::from_value(&json!({
            "component_type": "  ", "event": {"name": "onClick"}, "target": 42
        }))
        .unwrap();
        assert_eq!(raw.component_type, None);
        assert_eq!(raw.event, None);
        assert_eq!(raw.target.as_deref(), Some("42"));
    }

    #[test]
    fn non_objects_are_rejected() {
        assert!(RawEdge::from_value(&json!("pages/A")).is_none());
        assert!(RawEdge::from_value(&json!(null)).is_none());
    }
}
