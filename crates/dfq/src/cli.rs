//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the dfq CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use datafilter_rs::SqlDialect;

/// dfq - Render and evaluate filter expressions
#[derive(Parser, Debug)]
#[command(name = "dfq")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse an expression and print its terms
    #[command(alias = "p")]
    Parse {
        /// Filter expression (e.g., 'uid eq "alice" and age ge 18')
        expr: String,
    },

    /// Render an expression as a SQL WHERE fragment
    Sql {
        /// Filter expression
        expr: String,

        /// Raw SQL appended after the rendered expression (e.g., " LIMIT 1")
        #[arg(long, allow_hyphen_values = true)]
        suffix: Option<String>,

        /// Quoting dialect (default: from config, else ansi)
        #[arg(long, value_enum)]
        dialect: Option<Dialect>,

        /// Quote field names
        #[arg(long)]
        quote_identifiers: bool,
    },

    /// Render an expression as an LDAP filter string
    Ldap {
        /// Filter expression
        expr: String,
    },

    /// Render an expression as a Mongo-style filter document
    Mongo {
        /// Filter expression
        expr: String,
    },

    /// Evaluate an expression against a JSON array of records
    #[command(alias = "e")]
    Eval {
        /// Filter expression
        expr: String,

        /// JSON file to read records from (default: stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// View and edit configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// SQL quoting dialects
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dialect {
    Ansi,
    Mysql,
}

impl From<Dialect> for SqlDialect {
    fn from(dialect: Dialect) -> Self {
        match dialect {
            Dialect::Ansi => SqlDialect::Ansi,
            Dialect::Mysql => SqlDialect::MySql,
        }
    }
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., sql.dialect)
        key: String,

        /// Configuration value
        value: String,
    },

    /// Print config file path
    Path,
}
