//! Conversion from CLI errors to miette reports.

use crate::error::{CliError, ConfigError};
use miette::Report;
use ptg_graph::WalkerError;
use ptg_llm::WorkflowError;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Config(e) => config_error_to_miette(e),
        CliError::Walker(e) => walker_error_to_miette(e),
        CliError::Llm(e) => miette::miette!("LLM provider error: {}", e),
        CliError::Workflow(e) => workflow_error_to_miette(e),
        _ => miette::miette!("{}", err),
    }
}

fn config_error_to_miette(err: ConfigError) -> Report {
    match err {
        ConfigError::MissingApiKey { env } => miette::miette!(
            help = format!("export {env}=<your key>, or select another provider"),
            "Missing env {}",
            env
        ),
        other => miette::miette!("Configuration error: {}", other),
    }
}

fn walker_error_to_miette(err: WalkerError) -> Report {
    match err {
        WalkerError::Manifest(e) => miette::miette!(
            help = "Check main_pages_path in the [projects] table",
            "{}",
            e
        ),
        WalkerError::ExtractionFailed { path, source } => miette::miette!(
            help = "Set on_extractor_error = \"skip\" under [traversal] to continue past failing files",
            "Navigation extraction failed for {}: {}",
            path.display(),
            source
        ),
        other => miette::miette!("{}", other),
    }
}

fn workflow_error_to_miette(err: WorkflowError) -> Report {
    match err {
        WorkflowError::MissingSourceRoot(path) => miette::miette!(
            help = "Check project_path (or ets_root) in the [projects] table",
            "Source directory does not exist: {}",
            path.display()
        ),
        WorkflowError::Manifest(e) => miette::miette!(
            help = "Check main_pages_path in the [projects] table",
            "{}",
            e
        ),
        other => miette::miette!("Workflow failed: {}", other),
    }
}
