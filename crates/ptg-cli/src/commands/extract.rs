//! The extraction run: configuration, provider setup, traversal, report.

use std::sync::Arc;

use ptg_graph::{NativeRuntime, RunOutcome, TraversalEngine};
use ptg_llm::LlmNavigationExtractor;
use tracing::info;

use crate::cli::Cli;
use crate::commands::connect;
use crate::config::PtgConfig;
use crate::error::{Result, ResultExt};
use crate::ui;

/// Run one extraction as described by the command line.
///
/// Every configuration problem (unknown names, missing API key) surfaces
/// before any request is sent.
pub async fn execute(args: &Cli) -> Result<RunOutcome> {
    let cwd = std::env::current_dir()?;
    let config = PtgConfig::load(args.config.as_deref(), &cwd)?;

    let target = args.target();
    let provider = config.provider(
        target
            .provider
            .as_deref()
            .unwrap_or(&config.defaults.provider),
    )?;
    let project = config.select_project(target.project.as_deref())?;
    let llm_config = provider.llm_config(|env| std::env::var(env).ok())?;
    let walker_config = config.walker_config(&project, &llm_config);

    info!(
        provider = provider.name,
        model = %llm_config.model,
        project = project.name,
        "Extracting page transition graph"
    );
    let extractor = LlmNavigationExtractor::new(connect(llm_config).await?);

    let engine = TraversalEngine::new(
        walker_config,
        Arc::new(NativeRuntime::new()),
        Arc::new(extractor),
    );
    let outcome = engine.run().await?;

    report(&outcome, args.quiet)?;
    Ok(outcome)
}

fn report(outcome: &RunOutcome, quiet: bool) -> Result<()> {
    if !quiet {
        ui::success(&format!("PTG saved: {}", outcome.output_path.display()));
        ui::info(&ui::run_summary(outcome));
        if outcome.stats.pages_skipped > 0 {
            ui::warning("Some main pages had no source file under the ets root");
        }
    }

    let json = outcome
        .memory
        .to_json()
        .context("Failed to render the graph")?;
    println!("{json}");
    Ok(())
}
