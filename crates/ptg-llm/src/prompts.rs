//! Prompt text for navigation extraction.

use ptg_graph::ExtractionRequest;
use serde_json::{Map, Value};

/// System prompt sent with every extraction request.
pub const SYSTEM_PROMPT: &str = r#"Role: You are an expert static-analysis assistant for HarmonyOS ArkTS/ETS projects.

Goal: Given ONE ArkTS/ETS file (and small structured context), extract ALL navigation transitions that eventually lead to a main page.

Hard requirements:
- Use ONLY evidence from the provided code and provided context.
- Identify explicit and implicit navigation calls (router.push / router.replace / pushUrl / replaceUrl / back / Navigation.* / NavPathStack.* / wrappers).
- Resolve route-constant identifiers when possible, using the provided Route Constant Map.
- Return STRICT JSON only (no markdown, no code fences, no extra text).

Output schema (JSON array):
[
  {
    "component_type": "string",
    "event": "string",
    "target": "string"
  }
]

Field rules:
- component_type: the UI component or trigger (e.g., Button, ListItem, onClick, router.push). Use "__Common__" if trigger is inside a nested component and the exact UI component is unclear.
- event: event name that triggers navigation (e.g., onClick, onTap). Use "unknown" if unclear.
- target:
  - Prefer an actual main page path string (e.g., pages/xxx/DetailPage.ets).
  - If the code uses an identifier like RoutePath.TopicDetailPage, and the Route Constant Map contains it, output the resolved string value.
  - If it cannot be resolved, output the identifier text as-is.
- If there is no navigation, return [].
"#;

fn non_blank(items: &[String]) -> Value {
    Value::Array(
        items
            .iter()
            .filter(|item| !item.trim().is_empty())
            .map(|item| Value::String(item.clone()))
            .collect(),
    )
}

/// Context object embedded in the user prompt; keys keep a fixed order.
pub fn context_json(request: &ExtractionRequest) -> Value {
    let mut context = Map::new();
    context.insert("file_path".into(), Value::String(request.file_path.clone()));
    context.insert("dependency_chain".into(), non_blank(&request.dependency_chain));
    context.insert(
        "resolved_import_files".into(),
        non_blank(&request.resolved_import_files),
    );
    context.insert("main_pages".into(), non_blank(&request.main_pages));
    context.insert(
        "route_constant_map".into(),
        Value::Object(
            request
                .route_constant_map
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        ),
    );
    Value::Object(context)
}

/// Build the user message for one file.
pub fn build_user_prompt(request: &ExtractionRequest) -> String {
    format!(
        "Task: Extract navigation transitions from the given ArkTS/ETS file.\n\
         Return ONLY a JSON array.\n\n\
         Context (JSON):\n\
         {}\n\n\
         Source code:\n<code>\n\
         {}\n\
         </code>\n",
        context_json(request),
        request.code
    )
}
