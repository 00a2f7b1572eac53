//! Command-line interface definition.

use clap::{Args, Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

/// Flags that keep their dashes; every other dashed token is a name.
const KNOWN_FLAGS: &[&str] = &[
    "-c",
    "--config",
    "-v",
    "--verbose",
    "-q",
    "--quiet",
    "--no-color",
    "-h",
    "--help",
    "-V",
    "--version",
    "--chunk-size",
    "--no-preprocess",
];

/// Flags whose value is the next token.
const VALUE_FLAGS: &[&str] = &["-c", "--config", "--chunk-size"];

/// Short flags without a value, allowed in clusters such as `-vq`.
const SHORT_SWITCHES: &[char] = &['v', 'q', 'h', 'V'];

/// Extract the page transition graph of a HarmonyOS ArkTS/ETS project
#[derive(Parser, Debug)]
#[command(
    name = "ptg",
    version,
    about = "Extract the page transition graph of a HarmonyOS ArkTS/ETS project",
    long_about = "Walks every main page of a HarmonyOS project and the components it imports,\n\
                  asks a language model which navigation calls each file makes, and writes the\n\
                  resulting page transition graph as JSON.\n\n\
                  Provider and project names may be written with leading dashes: `ptg --glm --Demo`.",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub target: Target,

    /// Configuration file (defaults to ./ptg.toml when present)
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors and the graph itself
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Provider and project selection.
#[derive(Args, Debug, Clone, Default)]
pub struct Target {
    /// LLM provider (deepseek, glm, doubao, ollama, or one from ptg.toml)
    pub provider: Option<String>,

    /// Project name from the [projects] table of ptg.toml
    pub project: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send the whole project to the model in one chunked conversation
    Workflow(WorkflowArgs),
}

#[derive(Args, Debug)]
pub struct WorkflowArgs {
    #[command(flatten)]
    pub target: Target,

    /// Character budget per context chunk (overrides [workflow] chunk_size)
    #[arg(long, value_name = "CHARS")]
    pub chunk_size: Option<usize>,

    /// Send the raw sources instead of model-written skeletons
    #[arg(long)]
    pub no_preprocess: bool,
}

impl Cli {
    /// Parse the process arguments after [`normalize_args`].
    pub fn parse_normalized() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    /// Provider and project of whichever mode was selected.
    pub fn target(&self) -> &Target {
        match &self.command {
            Some(Command::Workflow(args)) => &args.target,
            None => &self.target,
        }
    }
}

/// Strip leading dashes from positional names and drop blank tokens.
///
/// The first item is the program name and is passed through untouched, as is
/// the value following `--config` or `--chunk-size`. Clusters of short flags
/// (`-vq`, `-cptg.toml`) are kept.
///
/// ```
/// use ptg_cli::cli::normalize_args;
///
/// let args = normalize_args(["ptg", "--deepseek", "-vc", "my.toml", "--Demo"]);
/// assert_eq!(args, vec!["ptg", "deepseek", "-vc", "my.toml", "Demo"]);
/// ```
pub fn normalize_args<I, T>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut out = Vec::new();
    let mut takes_value = false;

    for (index, arg) in args.into_iter().enumerate() {
        let arg = arg.into().to_string_lossy().into_owned();
        if index == 0 || takes_value {
            takes_value = false;
            out.push(arg);
            continue;
        }

        let token = arg.trim();
        if token.is_empty() {
            continue;
        }

        if KNOWN_FLAGS.contains(&token) {
            takes_value = VALUE_FLAGS.contains(&token);
            out.push(token.to_string());
        } else if let Some(value_follows) = short_cluster(token) {
            takes_value = value_follows;
            out.push(token.to_string());
        } else if is_flag_with_value(token) || !token.starts_with('-') {
            out.push(token.to_string());
        } else {
            let name = token.trim_start_matches('-');
            if !name.is_empty() {
                out.push(name.to_string());
            }
        }
    }
    out
}

/// `--config=...` and other `--flag=value` forms of [`VALUE_FLAGS`].
fn is_flag_with_value(token: &str) -> bool {
    token
        .split_once('=')
        .is_some_and(|(flag, _)| flag.starts_with("--") && VALUE_FLAGS.contains(&flag))
}

/// Classify a single-dash token.
///
/// `None` when it is a name rather than a cluster of short flags; otherwise
/// whether the next token is the value of a trailing `-c`.
fn short_cluster(token: &str) -> Option<bool> {
    let letters = token.strip_prefix('-')?;
    if letters.is_empty() || letters.starts_with('-') {
        return None;
    }
    for (index, letter) in letters.char_indices() {
        if letter == 'c' {
            return Some(index + 1 == letters.len());
        }
        if !SHORT_SWITCHES.contains(&letter) {
            return None;
        }
    }
    Some(false)
}
