//! `ptg`: page transition graph extractor for HarmonyOS ArkTS/ETS projects.

use miette::Result;
use ptg_cli::cli::{Cli, Command};
use ptg_cli::{commands, error, logger, ui};

#[tokio::main]
async fn main() -> Result<()> {
    // API keys may come from a .env file next to ptg.toml
    dotenv::dotenv().ok();

    let args = Cli::parse_normalized();

    let no_color = args.no_color || !logger::should_use_colors();
    logger::init_logger(args.verbose, args.quiet, no_color);
    ui::init_colors(no_color);

    let result = match &args.command {
        Some(Command::Workflow(workflow)) => commands::workflow_execute(&args, workflow)
            .await
            .map(|_| ()),
        None => commands::extract_execute(&args).await.map(|_| ()),
    };
    result.map_err(error::miette::cli_error_to_miette)
}
