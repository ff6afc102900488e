//! LDAP filter rendering (RFC 4515 string form).

use tracing::debug;

use crate::clause::{Clause, Operand, Operator};
use crate::error::{FilterError, FilterResult};
use crate::filter::{Connective, Filter, Term};

/// Escapes a literal assertion value per RFC 4515.
fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '*' => out.push_str("\\2a"),
            '(' => out.push_str("\\28"),
            ')' => out.push_str("\\29"),
            '\\' => out.push_str("\\5c"),
            '\0' => out.push_str("\\00"),
            _ => out.push(c),
        }
    }
    out
}

impl Clause {
    /// Renders this clause as an LDAP filter component.
    ///
    /// String literals are escaped. Numbers and bare names are written as-is,
    /// so `cn eq *` renders the presence filter `(cn=*)`.
    pub fn to_ldap(&self) -> String {
        let field = self.field();
        let value = match self.operand() {
            Operand::Text(text) => escape_value(text),
            Operand::Number(raw) | Operand::Field(raw) => raw.clone(),
        };
        match self.operator() {
            Operator::Eq => format!("({field}={value})"),
            Operator::Ne => format!("(!({field}={value}))"),
            Operator::Ge => format!("({field}>={value})"),
            Operator::Le => format!("({field}<={value})"),
            // LDAP has no strict comparisons.
            Operator::Gt => format!("(&({field}>={value})(!({field}={value})))"),
            Operator::Lt => format!("(&({field}<={value})(!({field}={value})))"),
        }
    }
}

impl Filter {
    /// Renders the filter as an LDAP filter string.
    ///
    /// All clauses are combined under one `&` or `|`. A filter holding a single
    /// clause renders that clause unwrapped. Parenthesis markers are dropped,
    /// since the combinator already groups its components. An empty filter
    /// renders as an empty string.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::MixedConnectives` if both `and` and `or` appear.
    pub fn to_ldap(&self) -> FilterResult<String> {
        let mut combinator: Option<Connective> = None;
        let mut components = String::new();
        let mut clause_count = 0usize;

        for term in self.terms() {
            match term {
                Term::And | Term::Or => {
                    let connective = term.connective();
                    if combinator.is_some() && combinator != connective {
                        debug!(filter = %self, "LDAP render rejected mixed connectives");
                        return Err(FilterError::MixedConnectives);
                    }
                    combinator = connective;
                }
                Term::OpenParen | Term::CloseParen => {}
                Term::Clause(clause) => {
                    components.push_str(&clause.to_ldap());
                    clause_count += 1;
                }
            }
        }

        let prefix = match combinator {
            None if clause_count <= 1 => return Ok(components),
            // Clauses pushed side by side without a connective are all required.
            None | Some(Connective::And) => '&',
            Some(Connective::Or) => '|',
        };
        Ok(format!("({prefix}{components})"))
    }
}
