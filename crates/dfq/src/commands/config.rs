//! Config command implementation.
//!
//! View and manage configuration settings.
//! Config file is located at ~/.config/dfq/config.toml.

use std::env;
use std::fs;
use std::path::PathBuf;

use datafilter_rs::SqlDialect;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Environment variable overriding the config file path.
pub const CONFIG_ENV: &str = "DFQ_CONFIG";

/// Keys accepted by `config set`.
const VALID_KEYS: &[&str] = &[
    "sql.dialect",
    "sql.quote_identifiers",
    "output.color",
    "output.pretty",
];

/// Configuration file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// SQL rendering settings.
    #[serde(default)]
    pub sql: SqlConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            sql: SqlConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// SQL rendering configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SqlConfig {
    /// Literal and identifier quoting dialect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialect: Option<SqlDialect>,

    /// Quote field names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_identifiers: Option<bool>,
}

/// Output configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enable colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,

    /// Pretty-print JSON output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretty: Option<bool>,
}

/// Gets the config file path.
///
/// Uses `DFQ_CONFIG` if set, then `$XDG_CONFIG_HOME/dfq/config.toml`,
/// then `~/.config/dfq/config.toml` on all platforms.
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }

    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("dfq").join("config.toml"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("dfq").join("config.toml"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Loads the configuration from disk.
///
/// A missing file yields the defaults.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;

    debug!(path = %path.display(), version = config.version, "loaded config");
    migrate_config(config)
}

/// Migrates config to current version if needed.
fn migrate_config(mut config: Config) -> Result<Config> {
    // Version 1 is the only schema so far.
    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Saves the configuration to disk, creating the directory if needed.
fn save_config(config: &Config) -> Result<()> {
    let path = get_config_path()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| CommandError::Config(format!("Failed to create config directory: {}", e)))?;
    }

    let content = toml::to_string_pretty(config)
        .map_err(|e| CommandError::Config(format!("Failed to serialize config: {}", e)))?;

    fs::write(&path, content)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {}", e)))?;

    Ok(())
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let config = load_config()?;
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        });
        println!("{}", ctx.to_json(&output)?);
    } else if !ctx.quiet {
        use owo_colors::OwoColorize;

        let header = "Configuration";
        if ctx.use_colors {
            println!("{}\n", header.green().bold());
        } else {
            println!("{}\n", header);
        }

        println!("File: {}", path.display());
        println!("Exists: {}\n", path.exists());

        let dialect = config.sql.dialect.unwrap_or_default();
        println!("[sql]");
        println!("  dialect: {}", dialect.name());
        println!(
            "  quote_identifiers: {}",
            config.sql.quote_identifiers.unwrap_or(false)
        );

        println!("\n[output]");
        println!("  color: {}", config.output.color.unwrap_or(true));
        println!("  pretty: {}", config.output.pretty.unwrap_or(true));
    }

    Ok(())
}

/// Options for the config set command.
pub struct ConfigSetOptions {
    /// Configuration key.
    pub key: String,
    /// Configuration value.
    pub value: String,
}

/// Applies one `key = value` setting to a config.
fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "sql.dialect" => {
            let dialect = SqlDialect::from_name(value).ok_or_else(|| {
                CommandError::Config(format!(
                    "Invalid dialect value '{}'. Valid values: ansi, mysql",
                    value
                ))
            })?;
            config.sql.dialect = Some(dialect);
        }
        "sql.quote_identifiers" => config.sql.quote_identifiers = Some(parse_bool(value)?),
        "output.color" => config.output.color = Some(parse_bool(value)?),
        "output.pretty" => config.output.pretty = Some(parse_bool(value)?),
        _ => {
            return Err(CommandError::Config(format!(
                "Unknown config key '{}'. Valid keys: {}",
                key,
                VALID_KEYS.join(", ")
            )));
        }
    }
    Ok(())
}

/// Executes the config set command.
pub fn execute_set(ctx: &CommandContext, opts: &ConfigSetOptions) -> Result<()> {
    let mut config = load_config()?;
    let path = get_config_path()?;

    apply_setting(&mut config, &opts.key, &opts.value)?;
    save_config(&config)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "key": opts.key,
            "value": opts.value,
            "path": path.display().to_string(),
        });
        println!("{}", ctx.to_json(&output)?);
    } else if !ctx.quiet {
        println!("Set {} = {}", opts.key, opts.value);
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", ctx.to_json(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

/// Parses a boolean value from string.
fn parse_bool(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(CommandError::Config(format!(
            "Invalid boolean value '{}'. Use true/false, yes/no, 1/0, or on/off",
            s
        ))),
    }
}
