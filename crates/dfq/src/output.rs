//! Output formatting utilities for the dfq CLI.

use datafilter_rs::{Operand, Term};
use owo_colors::OwoColorize;

/// Formats a section header, bold green when colors are enabled.
pub fn format_header(text: &str, use_colors: bool) -> String {
    if use_colors {
        text.green().bold().to_string()
    } else {
        text.to_string()
    }
}

/// Returns the short kind label of a term.
fn term_kind(term: &Term) -> &'static str {
    match term {
        Term::Clause(_) => "clause",
        Term::And => "and",
        Term::Or => "or",
        Term::OpenParen => "open",
        Term::CloseParen => "close",
    }
}

/// Returns the short kind label of an operand.
fn operand_kind(operand: &Operand) -> &'static str {
    match operand {
        Operand::Text(_) => "text",
        Operand::Number(_) => "number",
        Operand::Field(_) => "field",
    }
}

/// Formats a term sequence as a table: index, kind, and the term text.
///
/// Clauses also show their operand kind, so `a eq b` (a field reference)
/// reads differently from `a eq "b"`.
pub fn format_terms_table(terms: &[Term], use_colors: bool) -> String {
    if terms.is_empty() {
        return "No terms.".to_string();
    }

    let header = format!("{:<4} {:<7} {}", "#", "KIND", "TERM");
    let mut output = format_header(&header, use_colors);
    output.push('\n');

    for (index, term) in terms.iter().enumerate() {
        let kind = term_kind(term);
        let kind = if use_colors && term.connective().is_some() {
            kind.cyan().to_string()
        } else {
            kind.to_string()
        };
        let text = match term {
            Term::Clause(clause) => {
                let operand = operand_kind(clause.operand());
                if use_colors {
                    format!("{clause}  {}", format!("({operand})").dimmed())
                } else {
                    format!("{clause}  ({operand})")
                }
            }
            other => other.to_string(),
        };
        // ANSI codes break `{:<7}`, so pad by the plain label width.
        let padding = " ".repeat(7usize.saturating_sub(term_kind(term).len()));
        output.push_str(&format!("{:<4} {kind}{padding} {text}\n", index));
    }

    output
}
