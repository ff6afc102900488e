//! The filter expression: an ordered sequence of terms.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::clause::Clause;
use crate::error::{FilterError, FilterResult};
use crate::parser::parse_terms;

/// A boolean connective joining two clause-bearing terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Connective {
    /// Both sides must match.
    And,
    /// Either side may match.
    Or,
}

impl Connective {
    /// The keyword used in filter text.
    pub fn keyword(self) -> &'static str {
        match self {
            Connective::And => "and",
            Connective::Or => "or",
        }
    }
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// One element of a filter's term sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Term {
    /// An atomic comparison.
    Clause(Clause),
    /// The `and` connective.
    And,
    /// The `or` connective.
    Or,
    /// A `(` marker.
    OpenParen,
    /// A `)` marker.
    CloseParen,
}

impl Term {
    /// Returns the connective this term represents, if any.
    pub fn connective(&self) -> Option<Connective> {
        match self {
            Term::And => Some(Connective::And),
            Term::Or => Some(Connective::Or),
            _ => None,
        }
    }

    /// Returns the clause this term holds, if any.
    pub fn as_clause(&self) -> Option<&Clause> {
        match self {
            Term::Clause(clause) => Some(clause),
            _ => None,
        }
    }
}

impl From<Connective> for Term {
    fn from(connective: Connective) -> Self {
        match connective {
            Connective::And => Term::And,
            Connective::Or => Term::Or,
        }
    }
}

impl From<Clause> for Term {
    fn from(clause: Clause) -> Self {
        Term::Clause(clause)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Clause(clause) => clause.fmt(f),
            Term::And => f.write_str("and"),
            Term::Or => f.write_str("or"),
            Term::OpenParen => f.write_str("("),
            Term::CloseParen => f.write_str(")"),
        }
    }
}

/// A filter expression that renders to SQL, LDAP, and Mongo-style documents,
/// and evaluates against in-memory records.
///
/// A filter is built once, from text with [`Filter::parse`] or by composition
/// starting from [`Filter::empty`], and only ever grows afterwards. Rendering
/// never changes it.
///
/// # Example
///
/// ```
/// use datafilter_rs::Filter;
///
/// let filter = Filter::parse("a eq 1 and b eq 2").unwrap();
/// assert_eq!(filter.to_sql(), "a = 1 AND b = 2");
/// assert_eq!(filter.to_ldap().unwrap(), "(&(a=1)(b=2))");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Filter {
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    terms: Vec<Term>,
    #[serde(skip_serializing_if = "String::is_empty")]
    sql_suffix: String,
}

impl Filter {
    /// Parses a filter expression.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::EmptyExpression` for empty input, and a clause
    /// error when a clause has no recognized operator or is otherwise
    /// malformed. No partial filter is returned.
    pub fn parse(text: &str) -> FilterResult<Self> {
        let terms = parse_terms(text)?;
        debug!(expression = text, terms = terms.len(), "parsed filter");
        Ok(Self {
            source: Some(text.to_string()),
            terms,
            sql_suffix: String::new(),
        })
    }

    /// Creates a filter with no terms and no source text.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The text this filter was parsed from, if any.
    pub fn source_text(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// The term sequence.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Iterates over the clauses in order.
    pub fn clauses(&self) -> impl Iterator<Item = &Clause> {
        self.terms.iter().filter_map(Term::as_clause)
    }

    /// Returns true if the filter has no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Text appended verbatim to every SQL render.
    pub fn raw_sql_suffix(&self) -> &str {
        &self.sql_suffix
    }

    /// Appends a connective term.
    pub fn append_connective(&mut self, connective: Connective) {
        self.terms.push(connective.into());
    }

    /// Appends a single clause term.
    pub fn push_clause(&mut self, clause: Clause) {
        self.terms.push(clause.into());
    }

    /// Parses `text` with the filter grammar and appends the resulting terms.
    ///
    /// The filter is left unchanged if `text` fails to parse.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Filter::parse`].
    pub fn append_clause_text(&mut self, text: &str) -> FilterResult<()> {
        let terms = parse_terms(text)?;
        self.terms.extend(terms);
        Ok(())
    }

    /// Appends copies of another filter's terms.
    ///
    /// The other filter's terms are flattened into this one, not nested. Its
    /// source text and SQL suffix are not carried over.
    pub fn merge(&mut self, other: &Filter) {
        self.terms.extend(other.terms.iter().cloned());
    }

    /// Appends raw text to every future SQL render.
    ///
    /// The text is not escaped or checked in any way.
    pub fn append_raw_sql_suffix(&mut self, text: &str) {
        self.sql_suffix.push_str(text);
    }

    /// Returns true if the original source text contains `needle`.
    ///
    /// Only the text given to [`Filter::parse`] is searched. A filter built
    /// by composition has no source text and always returns false.
    pub fn contains_substring(&self, needle: &str) -> bool {
        self.source
            .as_deref()
            .is_some_and(|source| source.contains(needle))
    }

    /// Returns the first clause whose field name, or field-reference operand,
    /// contains `needle`.
    pub fn find_clause_by_field_substring(&self, needle: &str) -> Option<&Clause> {
        self.clauses().find(|clause| clause.mentions_field(needle))
    }
}

impl FromStr for Filter {
    type Err = FilterError;

    fn from_str(s: &str) -> FilterResult<Self> {
        Filter::parse(s)
    }
}

/// Writes the term sequence back in filter grammar.
impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            match term {
                Term::And | Term::Or => write!(f, " {term} ")?,
                Term::CloseParen => f.write_str(")")?,
                Term::OpenParen | Term::Clause(_) => {
                    if i > 0 && matches!(self.terms[i - 1], Term::Clause(_) | Term::CloseParen) {
                        f.write_str(" ")?;
                    }
                    write!(f, "{term}")?;
                }
            }
        }
        Ok(())
    }
}
