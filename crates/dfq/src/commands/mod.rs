//! Command implementations for the dfq CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod completions;
pub mod config;
pub mod eval;
pub mod render;

use crate::cli::Cli;
use config::Config;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Filter parsing or rendering error.
    #[error("filter error: {0}")]
    Filter(#[from] datafilter_rs::FilterError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
    /// Whether to pretty-print JSON.
    pub pretty: bool,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments and the loaded config.
    ///
    /// Flags win over config: `--no-color` disables colors even when the
    /// config enables them.
    pub fn from_cli(cli: &Cli, config: &Config) -> Self {
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color && config.output.color.unwrap_or(true),
            quiet: cli.quiet,
            verbose: cli.verbose,
            pretty: config.output.pretty.unwrap_or(true),
        }
    }

    /// Serializes a value as JSON, pretty-printed unless disabled in config.
    pub fn to_json<T: serde::Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let text = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(text)
    }
}
