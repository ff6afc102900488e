//! Eval command implementation.
//!
//! Reads a JSON array of records from a file or stdin and prints the
//! records the expression matches.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use datafilter_rs::Filter;
use serde_json::Value;
use tracing::debug;

use super::{CommandContext, CommandError, Result};

/// Options for the eval command.
pub struct EvalOptions {
    /// Filter expression.
    pub expr: String,
    /// Records file; stdin when `None`.
    pub input: Option<PathBuf>,
}

/// Reads the raw record text from the input file or stdin.
fn read_input(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

/// Parses the records text, which must be a JSON array.
fn parse_records(text: &str) -> Result<Vec<Value>> {
    let value: Value = serde_json::from_str(text)?;
    match value {
        Value::Array(records) => Ok(records),
        other => Err(CommandError::Io(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("expected a JSON array of records, got {}", json_kind(&other)),
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Evaluates an expression against records text and clones out the matches.
pub fn evaluate_text(expr: &str, text: &str) -> Result<Vec<Value>> {
    let filter = Filter::parse(expr)?;
    let records = parse_records(text)?;
    let matched: Vec<Value> = filter.evaluate(&records).into_iter().cloned().collect();
    debug!(records = records.len(), matched = matched.len(), "evaluated filter");
    Ok(matched)
}

/// Executes the eval command.
pub fn execute(ctx: &CommandContext, opts: &EvalOptions) -> Result<()> {
    // Parse first so a bad expression fails before blocking on stdin.
    Filter::parse(&opts.expr)?;
    let text = read_input(opts.input.as_ref())?;
    let matched = evaluate_text(&opts.expr, &text)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "count": matched.len(),
            "records": matched,
        });
        println!("{}", ctx.to_json(&output)?);
    } else {
        println!("{}", ctx.to_json(&matched)?);
    }

    Ok(())
}
