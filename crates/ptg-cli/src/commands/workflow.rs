//! The long-prompt run: the whole project in one chunked conversation.

use std::sync::Arc;

use ptg_graph::NativeRuntime;
use ptg_llm::{LongPromptWorkflow, WorkflowOutcome};
use tracing::info;

use crate::cli::{Cli, WorkflowArgs};
use crate::commands::connect;
use crate::config::PtgConfig;
use crate::error::Result;
use crate::ui;

/// Run the long-prompt workflow as described by the command line.
pub async fn execute(args: &Cli, workflow: &WorkflowArgs) -> Result<WorkflowOutcome> {
    let cwd = std::env::current_dir()?;
    let config = PtgConfig::load(args.config.as_deref(), &cwd)?;

    let target = &workflow.target;
    let provider = config.provider(
        target
            .provider
            .as_deref()
            .unwrap_or(&config.defaults.provider),
    )?;
    let project = config.select_project(target.project.as_deref())?;
    let llm_config = provider.llm_config(|env| std::env::var(env).ok())?;
    let preprocess_config = provider.preprocess_config(&llm_config);

    let mut workflow_config = config.workflow_config(&project);
    if let Some(chunk_size) = workflow.chunk_size {
        workflow_config.chunk_size = chunk_size;
    }
    if workflow.no_preprocess {
        workflow_config.preprocess = false;
    }

    info!(
        provider = provider.name,
        model = %llm_config.model,
        project = project.name,
        chunk_size = workflow_config.chunk_size,
        preprocess = workflow_config.preprocess,
        "Running long-prompt workflow"
    );
    let preprocess_enabled = workflow_config.preprocess;
    let mut runner = LongPromptWorkflow::new(
        workflow_config,
        Arc::new(NativeRuntime::new()),
        Arc::from(connect(llm_config).await?),
    );
    if let Some(preprocess_config) = preprocess_config.filter(|_| preprocess_enabled) {
        runner = runner.with_preprocessor(Arc::from(connect(preprocess_config).await?));
    }

    let outcome = runner.run().await?;
    report(&outcome, args.quiet);
    Ok(outcome)
}

fn report(outcome: &WorkflowOutcome, quiet: bool) {
    if !quiet {
        ui::info(&format!(
            "Full prompt saved: {} ({} chars, {} messages)",
            outcome.full_prompt_path.display(),
            outcome.full_prompt_length,
            outcome.message_count
        ));
        ui::success(&format!("PTG saved: {}", outcome.output_path.display()));
    }
    println!("{}", outcome.completion_text);
}
