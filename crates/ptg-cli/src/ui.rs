//! Status messages on stderr.

use console::style;
use ptg_graph::RunOutcome;

/// Disable ANSI styling for the rest of the process.
pub fn init_colors(no_color: bool) {
    if no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }
}

pub fn success(message: &str) {
    eprintln!("{} {}", style("✓").green().bold(), message);
}

pub fn info(message: &str) {
    eprintln!("{} {}", style("ℹ").blue().bold(), message);
}

pub fn warning(message: &str) {
    eprintln!("{} {}", style("⚠").yellow().bold(), style(message).yellow());
}

/// One-line description of a finished run.
pub fn run_summary(outcome: &RunOutcome) -> String {
    let stats = outcome.stats;
    let mut summary = format!(
        "{} pages, {} edges, {} files analyzed",
        outcome.memory.page_count(),
        outcome.memory.edge_count(),
        stats.files_analyzed
    );
    if stats.pages_skipped > 0 {
        summary.push_str(&format!(", {} pages skipped", stats.pages_skipped));
    }
    summary
}
