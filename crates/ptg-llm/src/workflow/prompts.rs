//! Prompt text for the long-prompt workflow.

use crate::provider::Message;

/// Project framing; `<N>` is the project name, `<X>` the main pages list.
pub const GLOBAL_PROMPT: &str = "You are analyzing a HarmonyOS ArkTS app <N>. Main pages list: <X>. \
Only these paths are valid PTG keys and valid navigation targets.";

pub const TASK_PROMPT: &str = r#"1. You will receive a Context JSON: keys are folder/file names, values are ArkTS source code.
2. Find ALL page navigation relationships by locating router navigation calls (e.g., router.push/router.replace, Router.push, pushUrl, back, and similar wrappers).
  2.1. Import resolution (CRITICAL): when a code value contains local imports (e.g., import { HomePage } from './home/HomePage'), you MUST use the Context JSON tree to locate the referenced file and read its value (code) to continue analysis. Resolve relative paths based on the importing file’s directory.
3. For each navigation event:
   a. Key must be the ROOT main page (must be in the main pages list) that contains the navigation trigger or instantiates the component path that leads to it.
   b. component.type is the UI component that triggers the event (e.g., ListItem, Button). If the trigger is inside a nested/custom component instantiated by a main page, use { type: '__Common__' }.
   c. event is the event name (e.g., onClick).
   d. target must be the FULL target main page path (must be in the main pages list).
4. Simple example: In 'ContainerPage.ets', 'ListItem{}.onClick(() => { Router.push(RouterPath: DetailPage) })' means:
   - Key: 'pages/container/ContainerPage' (the page in the main pages)
   - Component: { type: 'ListItem' } (the component directly triggering the event)
   - Event: 'onClick' (the event that triggers navigation)
   - Target: 'pages/commonDetail/DetailPage' (the full path of the target main page)
5. Complex example, the situation of nested componend: In 'MainPage.ets': 'import { HomePage } from './home/HomePage'; ... TabContent() { HomePage()}', you should find the 'HomePage' component througth the path, and continue analysis, for example, the 'HomePage.ets': ListItem() { HomeListItemComponent({ item: item }).onClick(() => { Router.push(RoutePath.DetailPage) }) }, means:
	 - Key: 'pages/MainPage' (the page in the main pages)
	 - Component: { type: '__Common__' } (if the component is not a custom component, then it is '__Common__')
	 - Event: 'onClick' (the event that triggers navigation)
	 - Target: 'pages/commonDetail/DetailPage' (the full path of the target main page)
6. Context JSON: <X>
7. Output the complete PTG JSON.
"#;

/// Output contract; `<X>` is the main pages list.
pub const RESTRICTIVE_PROMPT: &str = r#"Output rules:
1. Output ONLY a single valid JSON object: { "pages/...": [ ... ], ... }.
2. Keys MUST be exactly and only the main pages list <X>.
3. Each value is an array of: { "component": { "type": "..." }, "event": "...", "target": "..." }.
4. target MUST be a main page path from <X>.
5. Do not output any extra text outside JSON."#;

/// Source-skeleton request; `{{CODE}}` is replaced by the file content.
pub const PREPROCESS_PROMPT_TEMPLATE: &str = r#"### Role
You are an expert HarmonyOS ArkTS developer.

### Goal
Given one ArkTS/ETS source file, output a compact code skeleton that preserves everything needed to recover navigation/routing relationships and to trace how a main page instantiates nested components.

### Keep (must)
1. All navigation/routing API calls and their arguments/targets, including but not limited to:
   - router.pushUrl, router.replaceUrl, router.back, router.clear, router.push, router.replace
   - Router.push, Router.replace, pushUrl, replaceUrl, back
   - Navigator.push, Navigator.pop
   - Navigation.pushPath, Navigation.pop, NavPathStack.pushPath, NavPathStack.pop
   - Any custom wrapper functions that call the above.
2. All imports/exports that reference:
   - pages, routes, navigation helpers/wrappers, constants/enums used as navigation targets.
   - custom UI components instantiated in build trees.
3. All event handlers and the minimal parent component chain that contains them (e.g., Column > List > ForEach > ListItem > ...).
4. String literals, route-path constants/enums/objects related to navigation (do not replace or rename them).

### Prune (aggressively)
- Styling, layout properties, resource ids, state variables, non-navigation business logic.
- Non-essential UI siblings that do not contain navigation and do not help connect to nested components.

### Special rule: wiring for cross-file analysis
If the file has no direct navigation calls, still keep:
- @Entry/@Component declarations
- build() tree structure
- custom component instantiations (e.g., HomePage(), MyItemComponent({...})) and their props/event handlers
This is needed so a later pass can follow imports/instantiation chains.

### Input
<source_code>
{{CODE}}
</source_code>

### Output
Return ONLY the simplified ArkTS code skeleton. Do not add explanations."#;

pub fn preprocess_prompt(code: &str) -> String {
    PREPROCESS_PROMPT_TEMPLATE.replace("{{CODE}}", code)
}

/// The assembled long prompt for one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongPrompt {
    global: String,
    restrictive: String,
    chunks: Vec<String>,
}

impl LongPrompt {
    /// Fill the templates. `pages` is the main pages list joined with `", "`;
    /// `chunks` are the serialized context chunks.
    pub fn new(project_name: &str, pages: &str, chunks: &[String]) -> Self {
        let total = chunks.len();
        Self {
            global: GLOBAL_PROMPT.replace("<N>", project_name).replace("<X>", pages),
            restrictive: RESTRICTIVE_PROMPT.replace("<X>", pages),
            chunks: chunks
                .iter()
                .enumerate()
                .map(|(i, chunk)| {
                    format!("<context_chunk {}/{total}>\n{chunk}\n</context_chunk>", i + 1)
                })
                .collect(),
        }
    }

    /// System message, task message, then one user message per chunk.
    pub fn messages(&self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.chunks.len() + 2);
        messages.push(Message::system(format!(
            "{}\n\n{}",
            self.global, self.restrictive
        )));
        messages.push(Message::user(TASK_PROMPT));
        messages.extend(self.chunks.iter().map(Message::user));
        messages
    }

    /// Plain-text rendering saved next to the results.
    pub fn full_text(&self) -> String {
        let mut parts = vec![self.global.as_str(), TASK_PROMPT, self.restrictive.as_str()];
        parts.extend(self.chunks.iter().map(String::as_str));
        parts.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Role;

    fn prompt() -> LongPrompt {
        LongPrompt::new(
            "OpenEye",
            "pages/Index, pages/Detail",
            &["[{\"path\":\"a\"}]".to_string(), "[]".to_string()],
        )
    }

    #[test]
    fn test_placeholders_are_filled() {
        let messages = prompt().messages();
        let system = &messages[0].content;
        assert!(system.starts_with("You are analyzing a HarmonyOS ArkTS app OpenEye. Main pages list: pages/Index, pages/Detail."));
        assert!(system.contains("\n\nOutput rules:\n"));
        assert!(!system.contains("<X>"));
        assert!(!system.contains("<N>"));
    }

    #[test]
    fn test_one_message_per_chunk() {
        let messages = prompt().messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].content, TASK_PROMPT);
        assert_eq!(
            messages[2].content,
            "<context_chunk 1/2>\n[{\"path\":\"a\"}]\n</context_chunk>"
        );
        assert!(messages[3].content.starts_with("<context_chunk 2/2>"));
    }

    #[test]
    fn test_full_text_order() {
        let text = prompt().full_text();
        let global = text.find("You are analyzing").unwrap();
        let task = text.find("1. You will receive").unwrap();
        let rules = text.find("Output rules:").unwrap();
        let chunk = text.find("<context_chunk 1/2>").unwrap();
        assert!(global < task && task < rules && rules < chunk);
    }

    #[test]
    fn test_preprocess_prompt_embeds_code() {
        let prompt = preprocess_prompt("struct A {}");
        assert!(prompt.contains("<source_code>\nstruct A {}\n</source_code>"));
        assert!(prompt.ends_with("Do not add explanations."));
    }
}
