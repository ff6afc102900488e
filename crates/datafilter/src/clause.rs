//! The atomic predicate a filter is built from.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use strsim::levenshtein;

use crate::error::{FilterError, FilterResult};
use crate::lexer::{read_whole_quoted, ClauseToken, Lexer};

/// Symbolic spellings people reach for instead of the operator keywords.
const SYMBOL_ALIASES: &[(&str, Operator)] = &[
    ("=", Operator::Eq),
    ("==", Operator::Eq),
    ("!=", Operator::Ne),
    ("<>", Operator::Ne),
    (">", Operator::Gt),
    (">=", Operator::Ge),
    ("<", Operator::Lt),
    ("<=", Operator::Le),
];

/// Maximum edit distance for an operator suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 1;

/// A comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// `eq` - equal
    Eq,
    /// `ne` - not equal
    Ne,
    /// `gt` - greater than
    Gt,
    /// `ge` - greater than or equal
    Ge,
    /// `lt` - less than
    Lt,
    /// `le` - less than or equal
    Le,
}

impl Operator {
    /// All operators, in keyword order.
    pub const ALL: [Operator; 6] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Gt,
        Operator::Ge,
        Operator::Lt,
        Operator::Le,
    ];

    /// The keyword used in filter text.
    pub fn keyword(self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Gt => "gt",
            Operator::Ge => "ge",
            Operator::Lt => "lt",
            Operator::Le => "le",
        }
    }

    /// Looks up an operator by its keyword (case-sensitive).
    pub fn from_keyword(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.keyword() == word)
    }

    /// The SQL comparison symbol.
    pub fn sql_symbol(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Lt => "<",
            Operator::Le => "<=",
        }
    }

    /// The Mongo query operator (`$eq`, `$ne`, ...).
    pub fn mongo_operator(self) -> &'static str {
        match self {
            Operator::Eq => "$eq",
            Operator::Ne => "$ne",
            Operator::Gt => "$gt",
            Operator::Ge => "$gte",
            Operator::Lt => "$lt",
            Operator::Le => "$lte",
        }
    }

    /// Applies the operator to an ordering of left against right.
    pub fn accepts(self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match self {
            Operator::Eq => ordering == Equal,
            Operator::Ne => ordering != Equal,
            Operator::Gt => ordering == Greater,
            Operator::Ge => ordering != Less,
            Operator::Lt => ordering == Less,
            Operator::Le => ordering != Greater,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// The right-hand side of a clause.
///
/// Whether the operand is a literal or a field reference is decided once,
/// when the clause is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Operand {
    /// A quoted string literal, quotes removed.
    Text(String),
    /// An unquoted numeric literal, kept as written.
    Number(String),
    /// An unquoted name referring to another field.
    Field(String),
}

impl Operand {
    /// Classifies the raw right-hand text of a clause.
    ///
    /// `clause` is only used for error messages.
    fn classify(raw: &str, clause: &str) -> FilterResult<Self> {
        if let Some((text, closed)) = read_whole_quoted(raw) {
            if !closed {
                return Err(FilterError::unterminated_quote(clause));
            }
            return Ok(Operand::Text(text));
        }
        if is_number(raw) {
            Ok(Operand::Number(raw.to_string()))
        } else {
            Ok(Operand::Field(raw.to_string()))
        }
    }

    /// Returns the operand as a numeric value, if it is a number literal.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Operand::Number(raw) => raw.parse().ok(),
            _ => None,
        }
    }

    /// Returns the referenced field name, if this is a field reference.
    pub fn as_field(&self) -> Option<&str> {
        match self {
            Operand::Field(name) => Some(name),
            _ => None,
        }
    }

    /// Returns the literal text or number as written, if this is a literal.
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Operand::Text(s) | Operand::Number(s) => Some(s),
            Operand::Field(_) => None,
        }
    }

    /// The operand's text without quoting, whatever its kind.
    pub fn raw(&self) -> &str {
        match self {
            Operand::Text(s) | Operand::Number(s) | Operand::Field(s) => s,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Text(s) => {
                write!(f, "\"")?;
                for c in s.chars() {
                    if c == '"' || c == '\\' {
                        write!(f, "\\")?;
                    }
                    write!(f, "{c}")?;
                }
                write!(f, "\"")
            }
            Operand::Number(s) | Operand::Field(s) => f.write_str(s),
        }
    }
}

/// Returns true if `raw` is a finite number.
pub(crate) fn is_number(raw: &str) -> bool {
    raw.parse::<f64>().is_ok_and(f64::is_finite)
}

/// An atomic comparison between a field and a literal or another field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Clause {
    field: String,
    operator: Operator,
    operand: Operand,
}

impl Clause {
    /// Creates a clause from its parts.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::EmptyField` if `field` is empty or whitespace.
    pub fn new(field: impl Into<String>, operator: Operator, operand: Operand) -> FilterResult<Self> {
        let field = field.into();
        if field.trim().is_empty() {
            return Err(FilterError::empty_field(format!("{field} {operator} {operand}")));
        }
        Ok(Self {
            field,
            operator,
            operand,
        })
    }

    /// Parses clause text of the form `field op value`.
    ///
    /// The first whitespace-delimited operator keyword splits the text. Each
    /// side must be a single token. The right-hand side is a string literal
    /// if quoted, a number literal if it reads as a number, and a field
    /// reference otherwise.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::MissingOperator` if no operator keyword is found,
    /// `FilterError::EmptyField` or `FilterError::MissingValue` if either side
    /// is empty, `FilterError::UnexpectedText` if either side has more than
    /// one token, and `FilterError::UnterminatedQuote` for an unclosed literal.
    pub fn parse(text: &str) -> FilterResult<Self> {
        let text = text.trim();
        let tokens = Lexer::new(text).tokenize();

        let Some((index, op)) = tokens.iter().enumerate().find_map(|(i, t)| match &t.token {
            ClauseToken::Word(word) => Operator::from_keyword(word).map(|op| (i, op)),
            ClauseToken::Quoted { .. } => None,
        }) else {
            return Err(FilterError::missing_operator(text, suggest_operator(&tokens)));
        };

        let (left, right) = tokens.split_at(index);
        let op_token = &right[0];
        let right = &right[1..];

        let Some(field_token) = left.first() else {
            return Err(FilterError::empty_field(text));
        };
        let Some(value_token) = right.first() else {
            return Err(FilterError::missing_value(text));
        };
        if let Some(extra) = left.get(1) {
            let extra = text[extra.start..op_token.start].trim();
            return Err(FilterError::unexpected_text(text, extra));
        }
        if let Some(extra) = right.get(1) {
            return Err(FilterError::unexpected_text(text, &text[extra.start..]));
        }

        let field = &text[field_token.start..field_token.end];
        let value = &text[value_token.start..value_token.end];
        Ok(Self {
            field: field.to_string(),
            operator: op,
            operand: Operand::classify(value, text)?,
        })
    }

    /// The field name on the left of the operator.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The comparison operator.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The right-hand operand.
    pub fn operand(&self) -> &Operand {
        &self.operand
    }

    /// Returns true if the left field name, or the right operand when it is a
    /// field reference, contains `needle`.
    pub fn mentions_field(&self, needle: &str) -> bool {
        self.field.contains(needle) || self.operand.as_field().is_some_and(|f| f.contains(needle))
    }
}

impl FromStr for Clause {
    type Err = FilterError;

    fn from_str(s: &str) -> FilterResult<Self> {
        Clause::parse(s)
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.operator, self.operand)
    }
}

/// Suggests an operator keyword for a clause that has none.
fn suggest_operator(tokens: &[crate::lexer::PositionedToken]) -> Option<String> {
    let words = tokens.iter().skip(1).filter_map(|t| match &t.token {
        ClauseToken::Word(w) => Some(w.as_str()),
        ClauseToken::Quoted { .. } => None,
    });

    let mut best: Option<(usize, Operator)> = None;
    for word in words {
        if let Some((_, op)) = SYMBOL_ALIASES.iter().find(|(sym, _)| *sym == word) {
            return Some(op.keyword().to_string());
        }
        let lower = word.to_lowercase();
        for op in Operator::ALL {
            let distance = levenshtein(&lower, op.keyword());
            if distance <= MAX_SUGGESTION_DISTANCE && best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, op));
            }
        }
    }
    best.map(|(_, op)| op.keyword().to_string())
}
