//! The `ptg` command-line tool.
//!
//! - [`cli`]: argument parsing, including the dash-tolerant positional names
//! - [`config`]: `ptg.toml` + `PTG_*` environment loading and the provider
//!   and project registries
//! - [`commands`]: the extraction run and the long-prompt workflow
//! - [`error`]: CLI error types and miette conversion
//! - [`logger`], [`ui`]: tracing setup and status output on stderr

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, ConfigError, Result, ResultExt};
