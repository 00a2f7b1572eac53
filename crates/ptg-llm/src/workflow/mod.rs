//! Whole-project extraction in a single conversation.
//!
//! Instead of walking imports file by file, the long-prompt workflow packs
//! every navigation-relevant source file into context chunks and asks the
//! model for the complete graph at once:
//!
//! 1. scan `<ets root>` for target `.ets` files, optionally replacing each
//!    with a model-written skeleton
//! 2. pack the files into chunks on file boundaries
//! 3. send system, task and chunk messages in one request
//! 4. save the rendered prompt and the model's answer

pub mod context;
pub mod prompts;

use chrono::{Local, NaiveDateTime};
use ptg_graph::paths::safe_dir_name;
use ptg_graph::{ManifestError, Runtime, RuntimeError, load_main_pages, strip_json_fence};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::LlmError;
use crate::provider::CompletionProvider;

pub use context::{ContextFile, chunk_context, is_target_ets, preprocess_source, scan_sources};
pub use prompts::LongPrompt;

/// Default chunk budget in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 1500;

/// Errors that stop a workflow run.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("Source directory does not exist: {}", .0.display())]
    MissingSourceRoot(PathBuf),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Failed to serialize context: {0}")]
    Json(#[from] serde_json::Error),
}

/// Inputs for one workflow run.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    pub project_name: String,
    pub main_pages_path: PathBuf,
    pub ets_root: PathBuf,
    /// Character budget per context chunk.
    pub chunk_size: usize,
    /// Replace each source file with a model-written skeleton first.
    pub preprocess: bool,
    /// Rendered prompts go to `<prompt_dir>/<project>/`.
    pub prompt_dir: PathBuf,
    /// Answers go to `<output_dir>/<project>/`.
    pub output_dir: PathBuf,
}

impl WorkflowConfig {
    pub fn new(
        project_name: impl Into<String>,
        main_pages_path: impl Into<PathBuf>,
        ets_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            main_pages_path: main_pages_path.into(),
            ets_root: ets_root.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            preprocess: true,
            prompt_dir: PathBuf::from("prompt"),
            output_dir: PathBuf::from("result"),
        }
    }
}

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct WorkflowOutcome {
    /// The answer with any code fence removed.
    pub completion_text: String,
    pub full_prompt_path: PathBuf,
    /// Length of the rendered prompt in characters.
    pub full_prompt_length: usize,
    pub message_count: usize,
    pub output_path: PathBuf,
    pub files: usize,
    pub chunks: usize,
}

/// `<prompt_dir>/<safe project>/full_prompt_<model>.txt`
pub fn full_prompt_path(prompt_dir: &Path, project_name: &str, model: &str) -> PathBuf {
    prompt_dir
        .join(safe_dir_name(project_name, "default"))
        .join(format!("full_prompt_{}.txt", safe_dir_name(model, "model")))
}

/// `<output_dir>/<safe project>/ptg_<model>_<YYYYmmdd_HHMMSS>.json`
pub fn workflow_output_path(
    output_dir: &Path,
    project_name: &str,
    model: &str,
    timestamp: &NaiveDateTime,
) -> PathBuf {
    output_dir
        .join(safe_dir_name(project_name, "default"))
        .join(format!(
            "ptg_{}_{}.json",
            safe_dir_name(model, "model"),
            timestamp.format("%Y%m%d_%H%M%S")
        ))
}

/// Pretty-print the answer when it is JSON; otherwise keep it verbatim.
pub fn render_result(completion_text: &str) -> String {
    serde_json::from_str::<serde_json::Value>(completion_text)
        .and_then(|value| serde_json::to_string_pretty(&value))
        .unwrap_or_else(|_| completion_text.to_string())
}

/// Runs the long-prompt workflow for one project.
pub struct LongPromptWorkflow {
    config: WorkflowConfig,
    runtime: Arc<dyn Runtime>,
    provider: Arc<dyn CompletionProvider>,
    preprocessor: Option<Arc<dyn CompletionProvider>>,
}

impl LongPromptWorkflow {
    pub fn new(
        config: WorkflowConfig,
        runtime: Arc<dyn Runtime>,
        provider: Arc<dyn CompletionProvider>,
    ) -> Self {
        Self {
            config,
            runtime,
            provider,
            preprocessor: None,
        }
    }

    /// Use a separate model for skeletons; by default the main provider is used.
    pub fn with_preprocessor(mut self, preprocessor: Arc<dyn CompletionProvider>) -> Self {
        self.preprocessor = Some(preprocessor);
        self
    }

    pub async fn run(&self) -> Result<WorkflowOutcome, WorkflowError> {
        self.run_at(Local::now().naive_local()).await
    }

    /// Run with a fixed timestamp for the result file name.
    pub async fn run_at(&self, timestamp: NaiveDateTime) -> Result<WorkflowOutcome, WorkflowError> {
        let config = &self.config;
        let runtime = self.runtime.as_ref();

        let files = self.collect_context().await?;
        let chunks = chunk_context(&files, config.chunk_size)?;
        info!(files = files.len(), chunks = chunks.len(), "Context packed");

        let pages = load_main_pages(runtime, &config.main_pages_path)
            .await?
            .join(", ");
        let prompt = LongPrompt::new(&config.project_name, &pages, &chunks);
        let messages = prompt.messages();
        let full_text = prompt.full_text();

        let model = self.provider.model_name();
        let full_prompt_path = full_prompt_path(&config.prompt_dir, &config.project_name, model);
        write_text(runtime, &full_prompt_path, &full_text).await?;
        info!(
            path = %full_prompt_path.display(),
            chars = full_text.chars().count(),
            "Full prompt saved"
        );

        let raw = self.provider.chat(&messages).await?;
        let completion_text = strip_json_fence(raw.trim());
        let output_path =
            workflow_output_path(&config.output_dir, &config.project_name, model, &timestamp);
        write_text(runtime, &output_path, &render_result(&completion_text)).await?;
        info!(path = %output_path.display(), "PTG saved");

        Ok(WorkflowOutcome {
            completion_text,
            full_prompt_path,
            full_prompt_length: full_text.chars().count(),
            message_count: messages.len(),
            output_path,
            files: files.len(),
            chunks: chunks.len(),
        })
    }

    async fn collect_context(&self) -> Result<Vec<ContextFile>, WorkflowError> {
        let ets_root = &self.config.ets_root;
        let sources = match scan_sources(self.runtime.as_ref(), ets_root).await {
            Ok(sources) => sources,
            Err(RuntimeError::FileNotFound(path)) if path == *ets_root => {
                return Err(WorkflowError::MissingSourceRoot(path));
            }
            Err(err) => return Err(err.into()),
        };

        if !self.config.preprocess {
            return Ok(sources);
        }

        let preprocessor = self.preprocessor.as_ref().unwrap_or(&self.provider);
        let mut files = Vec::with_capacity(sources.len());
        for source in sources {
            debug!(path = %source.path, "Preprocessing");
            let code = preprocess_source(preprocessor.as_ref(), &source.code).await;
            if !code.trim().is_empty() {
                files.push(ContextFile {
                    path: source.path,
                    code,
                });
            }
        }
        Ok(files)
    }
}

async fn write_text(runtime: &dyn Runtime, path: &Path, text: &str) -> Result<(), RuntimeError> {
    if let Some(parent) = path.parent() {
        runtime.create_dir(parent, true).await?;
    }
    runtime.write_file(path, text.as_bytes()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::provider::{Message, Role};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use ptg_graph::NativeRuntime;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Answers skeleton requests with a fenced stub and the graph request
    /// with a fenced PTG object; records every conversation.
    #[derive(Default)]
    struct Scripted {
        conversations: Mutex<Vec<Vec<Message>>>,
        fail_preprocessing: bool,
    }

    #[async_trait]
    impl CompletionProvider for Scripted {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
            unreachable!("the workflow only sends conversations")
        }

        async fn chat(&self, messages: &[Message]) -> Result<String> {
            self.conversations.lock().unwrap().push(messages.to_vec());
            let is_skeleton = messages.len() == 1 && messages[0].content.contains("<source_code>");
            if is_skeleton && self.fail_preprocessing {
                return Err(LlmError::Timeout { seconds: 3 });
            }
            if is_skeleton {
                Ok("```ts\nstruct Skeleton {}\n```".to_string())
            } else {
                Ok("```json\n{\"pages/Index\": [{\"component\": {\"type\": \"Button\"}, \"event\": \"onClick\", \"target\": \"pages/Detail\"}], \"pages/Detail\": []}\n```".to_string())
            }
        }

        fn provider_name(&self) -> &str {
            "scripted"
        }

        fn model_name(&self) -> &str {
            "model:1"
        }
    }

    struct Fixture {
        dir: TempDir,
        config: WorkflowConfig,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("app");
        let ets = root.join("src/main/ets");
        fs::create_dir_all(ets.join("pages")).unwrap();
        fs::create_dir_all(ets.join("entryability")).unwrap();
        fs::write(
            ets.join("pages/Index.ets"),
            "Button('go').onClick(() => router.pushUrl({ url: 'pages/Detail' }))",
        )
        .unwrap();
        fs::write(ets.join("pages/Detail.ets"), "struct Detail {}").unwrap();
        fs::write(ets.join("entryability/EntryAbility.ets"), "class A {}").unwrap();
        fs::write(
            root.join("main_pages.json"),
            r#"{"src": ["pages/Index", "pages/Detail"]}"#,
        )
        .unwrap();

        let mut config = WorkflowConfig::new("Open:Eye", root.join("main_pages.json"), ets);
        config.prompt_dir = dir.path().join("prompt");
        config.output_dir = dir.path().join("result");
        Fixture { dir, config }
    }

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap()
    }

    #[tokio::test]
    async fn test_run_without_preprocessing() {
        let fixture = fixture();
        let mut config = fixture.config.clone();
        config.preprocess = false;
        let provider = Arc::new(Scripted::default());
        let workflow =
            LongPromptWorkflow::new(config, Arc::new(NativeRuntime::new()), provider.clone());

        let outcome = workflow.run_at(timestamp()).await.unwrap();

        assert_eq!(outcome.files, 2);
        assert_eq!(outcome.chunks, 1);
        assert_eq!(outcome.message_count, 3);
        assert!(outcome.completion_text.starts_with("{\"pages/Index\""));

        let conversations = provider.conversations.lock().unwrap();
        assert_eq!(conversations.len(), 1);
        let messages = &conversations[0];
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains("Main pages list: pages/Index, pages/Detail."));
        assert!(messages[2].content.starts_with("<context_chunk 1/1>\n[{\"path\":\"pages/Detail.ets\""));
        assert!(messages[2].content.contains("router.pushUrl"));
        assert!(!messages[2].content.contains("EntryAbility"));

        assert_eq!(
            outcome.full_prompt_path,
            fixture.dir.path().join("prompt/Open_Eye/full_prompt_model_1.txt")
        );
        let saved_prompt = fs::read_to_string(&outcome.full_prompt_path).unwrap();
        assert_eq!(saved_prompt.chars().count(), outcome.full_prompt_length);

        assert_eq!(
            outcome.output_path,
            fixture.dir.path().join("result/Open_Eye/ptg_model_1_20250102_030405.json")
        );
        let saved: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&outcome.output_path).unwrap()).unwrap();
        assert_eq!(saved["pages/Index"][0]["target"], "pages/Detail");
        let keys: Vec<&String> = saved.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["pages/Index", "pages/Detail"]);
    }

    #[tokio::test]
    async fn test_preprocessing_replaces_sources_with_skeletons() {
        let fixture = fixture();
        let main = Arc::new(Scripted::default());
        let skeletons = Arc::new(Scripted::default());
        let workflow = LongPromptWorkflow::new(
            fixture.config.clone(),
            Arc::new(NativeRuntime::new()),
            main.clone(),
        )
        .with_preprocessor(skeletons.clone());

        workflow.run_at(timestamp()).await.unwrap();

        assert_eq!(skeletons.conversations.lock().unwrap().len(), 2);
        let main_calls = main.conversations.lock().unwrap();
        assert_eq!(main_calls.len(), 1);
        let chunk = &main_calls[0][2].content;
        assert!(chunk.contains("struct Skeleton {}"));
        assert!(!chunk.contains("router.pushUrl"));
        assert!(!chunk.contains("```"));
    }

    #[tokio::test]
    async fn test_failed_preprocessing_keeps_an_error_marker() {
        let fixture = fixture();
        let provider = Arc::new(Scripted {
            fail_preprocessing: true,
            ..Default::default()
        });
        let workflow = LongPromptWorkflow::new(
            fixture.config.clone(),
            Arc::new(NativeRuntime::new()),
            provider.clone(),
        );

        let outcome = workflow.run_at(timestamp()).await.unwrap();

        assert_eq!(outcome.files, 2);
        let conversations = provider.conversations.lock().unwrap();
        let chunk = &conversations.last().unwrap()[2].content;
        assert!(chunk.contains("// [PREPROCESS ERROR] LLM request timed out after 3s"));
    }

    #[tokio::test]
    async fn test_missing_source_root() {
        let fixture = fixture();
        let mut config = fixture.config.clone();
        config.ets_root = fixture.dir.path().join("nowhere");
        let workflow = LongPromptWorkflow::new(
            config,
            Arc::new(NativeRuntime::new()),
            Arc::new(Scripted::default()),
        );

        let err = workflow.run_at(timestamp()).await.unwrap_err();
        assert!(matches!(err, WorkflowError::MissingSourceRoot(_)));
        assert!(!fixture.dir.path().join("result").exists());
    }

    #[test]
    fn test_non_json_answers_are_saved_verbatim() {
        assert_eq!(render_result("no graph today"), "no graph today");
        assert_eq!(render_result("{\"a\":[]}"), "{\n  \"a\": []\n}");
    }
}
