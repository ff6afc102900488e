//! Parse and render commands.
//!
//! `parse` prints the term sequence; `sql`, `ldap`, and `mongo` print the
//! expression rendered for one backend.

use datafilter_rs::{Filter, SqlDialect, SqlStyle};
use tracing::debug;

use super::config::SqlConfig;
use super::{CommandContext, Result};
use crate::output::{format_header, format_terms_table};

/// Options for the sql command.
pub struct SqlOptions {
    /// Filter expression.
    pub expr: String,
    /// Raw SQL appended after the expression.
    pub suffix: Option<String>,
    /// Dialect from the command line, overriding config.
    pub dialect: Option<SqlDialect>,
    /// Quote identifiers (the flag can only turn quoting on).
    pub quote_identifiers: bool,
}

impl SqlOptions {
    /// Resolves the quoting style: flags first, then config, then ANSI.
    pub fn style(&self, config: &SqlConfig) -> SqlStyle {
        SqlStyle {
            dialect: self.dialect.or(config.dialect).unwrap_or_default(),
            quote_identifiers: self.quote_identifiers
                || config.quote_identifiers.unwrap_or(false),
        }
    }
}

/// Executes the parse command.
pub fn execute_parse(ctx: &CommandContext, expr: &str) -> Result<()> {
    let filter = Filter::parse(expr)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "source": expr,
            "terms": filter.terms(),
        });
        println!("{}", ctx.to_json(&output)?);
    } else if !ctx.quiet {
        print!("{}", format_terms_table(filter.terms(), ctx.use_colors));
    }

    Ok(())
}

/// Renders the SQL for an expression with resolved options.
pub fn render_sql(opts: &SqlOptions, config: &SqlConfig) -> Result<String> {
    let mut filter = Filter::parse(&opts.expr)?;
    if let Some(suffix) = &opts.suffix {
        filter.append_raw_sql_suffix(suffix);
    }
    let style = opts.style(config);
    debug!(dialect = style.dialect.name(), quote_identifiers = style.quote_identifiers, "rendering sql");
    Ok(filter.to_sql_with(&style))
}

/// Executes the sql command.
pub fn execute_sql(ctx: &CommandContext, opts: &SqlOptions, config: &SqlConfig) -> Result<()> {
    let sql = render_sql(opts, config)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "sql": sql,
            "dialect": opts.style(config).dialect,
        });
        println!("{}", ctx.to_json(&output)?);
    } else {
        println!("{sql}");
    }

    Ok(())
}

/// Executes the ldap command.
pub fn execute_ldap(ctx: &CommandContext, expr: &str) -> Result<()> {
    let ldap = Filter::parse(expr)?.to_ldap()?;

    if ctx.json_output {
        let output = serde_json::json!({ "ldap": ldap });
        println!("{}", ctx.to_json(&output)?);
    } else {
        println!("{ldap}");
    }

    Ok(())
}

/// Executes the mongo command.
pub fn execute_mongo(ctx: &CommandContext, expr: &str) -> Result<()> {
    let document = Filter::parse(expr)?.to_mongo_filter();

    if ctx.json_output {
        let output = serde_json::json!({ "mongo": document });
        println!("{}", ctx.to_json(&output)?);
    } else {
        if ctx.verbose {
            eprintln!("{}", format_header("Mongo filter", ctx.use_colors));
        }
        println!("{}", ctx.to_json(&document)?);
    }

    Ok(())
}
