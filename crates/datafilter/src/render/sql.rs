//! SQL rendering.
//!
//! Quoting is pluggable through [`SqlQuoter`] so a storage adapter can use its
//! driver's own literal quoting. Nothing here makes untrusted input safe to
//! interpolate; callers that accept values from users should bind parameters
//! instead.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::clause::{Clause, Operand};
use crate::filter::{Filter, Term};

/// Quotes literals and identifiers for a SQL backend.
pub trait SqlQuoter {
    /// Quotes a string literal.
    fn quote_literal(&self, value: &str) -> String;

    /// Quotes a field name. Names are passed through unchanged by default.
    fn quote_identifier(&self, name: &str) -> String {
        name.to_string()
    }
}

/// Built-in SQL quoting rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    /// Standard SQL: `'it''s'`, `"column"`.
    #[default]
    Ansi,
    /// MySQL: `'it\'s'`, `` `column` ``.
    MySql,
}

impl SqlDialect {
    /// The dialect's name as used in configuration.
    pub fn name(self) -> &'static str {
        match self {
            SqlDialect::Ansi => "ansi",
            SqlDialect::MySql => "mysql",
        }
    }

    /// Looks up a dialect by name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "ansi" => Some(SqlDialect::Ansi),
            "mysql" => Some(SqlDialect::MySql),
            _ => None,
        }
    }

    fn identifier_quote(self) -> char {
        match self {
            SqlDialect::Ansi => '"',
            SqlDialect::MySql => '`',
        }
    }
}

impl SqlQuoter for SqlDialect {
    fn quote_literal(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len() + 2);
        out.push('\'');
        for c in value.chars() {
            match (*self, c) {
                (SqlDialect::Ansi, '\'') => out.push_str("''"),
                (SqlDialect::MySql, '\'' | '\\') => {
                    out.push('\\');
                    out.push(c);
                }
                _ => out.push(c),
            }
        }
        out.push('\'');
        out
    }
}

/// A dialect plus the choice of whether to quote identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SqlStyle {
    /// Literal and identifier quoting rules.
    pub dialect: SqlDialect,
    /// Whether field names are quoted.
    pub quote_identifiers: bool,
}

impl SqlQuoter for SqlStyle {
    fn quote_literal(&self, value: &str) -> String {
        self.dialect.quote_literal(value)
    }

    fn quote_identifier(&self, name: &str) -> String {
        if !self.quote_identifiers {
            return name.to_string();
        }
        // Each part of a dotted name (`table.column`) is quoted on its own.
        let quote = self.dialect.identifier_quote();
        name.split('.')
            .map(|part| {
                let doubled = part.replace(quote, &format!("{quote}{quote}"));
                format!("{quote}{doubled}{quote}")
            })
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl Clause {
    /// Renders this clause as a SQL comparison.
    pub fn to_sql_with<Q: SqlQuoter + ?Sized>(&self, quoter: &Q) -> String {
        let value = match self.operand() {
            Operand::Text(text) => quoter.quote_literal(text),
            Operand::Number(raw) => raw.clone(),
            Operand::Field(name) => quoter.quote_identifier(name),
        };
        format!(
            "{} {} {}",
            quoter.quote_identifier(self.field()),
            self.operator().sql_symbol(),
            value
        )
    }
}

impl Filter {
    /// Renders the filter as a SQL boolean expression with ANSI quoting.
    ///
    /// Connectives become ` AND ` / ` OR `, parenthesis markers are kept, and
    /// the raw SQL suffix is appended last.
    pub fn to_sql(&self) -> String {
        self.to_sql_with(&SqlDialect::Ansi)
    }

    /// Renders the filter as a SQL boolean expression with the given quoting.
    pub fn to_sql_with<Q: SqlQuoter + ?Sized>(&self, quoter: &Q) -> String {
        trace!(terms = self.terms().len(), "rendering SQL");
        let mut out = String::new();
        for term in self.terms() {
            match term {
                Term::OpenParen => out.push('('),
                Term::CloseParen => out.push(')'),
                Term::And => out.push_str(" AND "),
                Term::Or => out.push_str(" OR "),
                Term::Clause(clause) => out.push_str(&clause.to_sql_with(quoter)),
            }
        }
        out.push_str(self.raw_sql_suffix());
        out
    }
}
