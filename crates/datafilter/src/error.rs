//! Error types for filter parsing and rendering.

use thiserror::Error;

/// A specialized Result type for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors that can occur while building or rendering a filter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    /// The filter expression is empty.
    #[error("filter expression is empty")]
    EmptyExpression,

    /// A clause contains no recognized comparison operator.
    #[error("no comparison operator in clause '{clause}'{}", suggestion_suffix(.suggestion))]
    MissingOperator {
        /// The clause text that could not be split.
        clause: String,
        /// A known operator close to a word found in the clause.
        suggestion: Option<String>,
    },

    /// A clause has an operator but no field name before it.
    #[error("missing field name in clause '{clause}'")]
    EmptyField {
        /// The offending clause text.
        clause: String,
    },

    /// A clause has an operator but nothing after it.
    #[error("missing value in clause '{clause}'")]
    MissingValue {
        /// The offending clause text.
        clause: String,
    },

    /// A quoted operand was opened but never closed.
    #[error("unterminated quote in clause '{clause}'")]
    UnterminatedQuote {
        /// The offending clause text.
        clause: String,
    },

    /// A clause side holds more than one token.
    #[error("unexpected '{text}' in clause '{clause}'")]
    UnexpectedText {
        /// The offending clause text.
        clause: String,
        /// The text after the first token of the field or value.
        text: String,
    },

    /// Both `and` and `or` appear where the backend supports only one.
    #[error("mixed combinators unsupported: LDAP filters cannot mix 'and' and 'or' at one level")]
    MixedConnectives,
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{s}'?)"),
        None => String::new(),
    }
}

impl FilterError {
    /// Creates a missing operator error.
    pub fn missing_operator(clause: impl Into<String>, suggestion: Option<String>) -> Self {
        FilterError::MissingOperator {
            clause: clause.into(),
            suggestion,
        }
    }

    /// Creates an empty field error.
    pub fn empty_field(clause: impl Into<String>) -> Self {
        FilterError::EmptyField {
            clause: clause.into(),
        }
    }

    /// Creates a missing value error.
    pub fn missing_value(clause: impl Into<String>) -> Self {
        FilterError::MissingValue {
            clause: clause.into(),
        }
    }

    /// Creates an unexpected text error.
    pub fn unexpected_text(clause: impl Into<String>, text: impl Into<String>) -> Self {
        FilterError::UnexpectedText {
            clause: clause.into(),
            text: text.into(),
        }
    }

    /// Creates an unterminated quote error.
    pub fn unterminated_quote(clause: impl Into<String>) -> Self {
        FilterError::UnterminatedQuote {
            clause: clause.into(),
        }
    }
}
