use clap::Parser;
use std::process::ExitCode;
use tracing::debug;

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands, ConfigCommands};
use commands::config::{load_config, Config, ConfigSetOptions};
use commands::eval::EvalOptions;
use commands::render::SqlOptions;
use commands::{CommandContext, CommandError};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": error_code(&e),
                        "message": e.to_string(),
                    }
                });
                eprintln!("{error_json:#}");
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::from(exit_status(&e))
        }
    }
}

/// Installs the stderr subscriber; `RUST_LOG` overrides the flag-derived level.
fn init_tracing(cli: &Cli) {
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else if cli.quiet {
        tracing::Level::ERROR
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> commands::Result<()> {
    // `config` and `completions` fall back to defaults when the file is broken.
    let config = match &cli.command {
        Commands::Config { .. } | Commands::Completions { .. } => {
            load_config().unwrap_or_else(|e| {
                debug!("ignoring unreadable config: {e}");
                Config::default()
            })
        }
        _ => load_config()?,
    };
    let ctx = CommandContext::from_cli(cli, &config);

    match &cli.command {
        Commands::Parse { expr } => commands::render::execute_parse(&ctx, expr),
        Commands::Sql {
            expr,
            suffix,
            dialect,
            quote_identifiers,
        } => {
            let opts = SqlOptions {
                expr: expr.clone(),
                suffix: suffix.clone(),
                dialect: dialect.map(Into::into),
                quote_identifiers: *quote_identifiers,
            };
            commands::render::execute_sql(&ctx, &opts, &config.sql)
        }
        Commands::Ldap { expr } => commands::render::execute_ldap(&ctx, expr),
        Commands::Mongo { expr } => commands::render::execute_mongo(&ctx, expr),
        Commands::Eval { expr, input } => {
            let opts = EvalOptions {
                expr: expr.clone(),
                input: input.clone(),
            };
            commands::eval::execute(&ctx, &opts)
        }
        Commands::Config { command } => match command {
            None | Some(ConfigCommands::Show) => commands::config::execute_show(&ctx),
            Some(ConfigCommands::Path) => commands::config::execute_path(&ctx),
            Some(ConfigCommands::Set { key, value }) => {
                let opts = ConfigSetOptions {
                    key: key.clone(),
                    value: value.clone(),
                };
                commands::config::execute_set(&ctx, &opts)
            }
        },
        Commands::Completions { shell } => Ok(commands::completions::execute(shell)?),
    }
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Filter(_) => "FILTER_ERROR",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the process exit status for an error.
fn exit_status(e: &CommandError) -> u8 {
    match e {
        CommandError::Config(_) => 5,
        CommandError::Filter(_) => 1,
        CommandError::Io(_) => 3,
        CommandError::Json(_) => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datafilter_rs::FilterError;

    #[test]
    fn test_error_codes() {
        let filter = CommandError::Filter(FilterError::EmptyExpression);
        let config = CommandError::Config("bad".to_string());
        let io = CommandError::Io(std::io::Error::new(std::io::ErrorKind::Other, "boom"));

        assert_eq!(error_code(&filter), "FILTER_ERROR");
        assert_eq!(error_code(&config), "CONFIG_ERROR");
        assert_eq!(error_code(&io), "IO_ERROR");

        assert_eq!(exit_status(&filter), 1);
        assert_eq!(exit_status(&config), 5);
        assert_eq!(exit_status(&io), 3);
    }

    #[test]
    fn test_error_messages() {
        let err = CommandError::Filter(FilterError::MixedConnectives);
        assert!(err.to_string().starts_with("filter error: mixed combinators unsupported"));
    }
}
