//! Splits filter text into a term sequence.
//!
//! The grammar is deliberately flat:
//!
//! ```text
//! expression ::= "(" body ")" | body
//! body       ::= clause | expression connective expression
//! connective ::= " and " | " or "
//! clause     ::= field op value
//! ```
//!
//! The leftmost connective splits the text and both halves are parsed again.
//! There is no precedence: terms come out in source order and the renderers
//! fold them left to right.

use tracing::trace;

use crate::clause::Clause;
use crate::error::{FilterError, FilterResult};
use crate::filter::{Connective, Term};

/// Parses `text` into an ordered term sequence.
///
/// # Errors
///
/// Returns `FilterError::EmptyExpression` for empty input or empty parentheses,
/// and any clause-level error from [`Clause::parse`].
pub(crate) fn parse_terms(text: &str) -> FilterResult<Vec<Term>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(FilterError::EmptyExpression);
    }

    let (body, parens) = match strip_outer_parens(trimmed) {
        Some(inner) => (inner.trim(), true),
        None => (trimmed, false),
    };
    if body.is_empty() {
        return Err(FilterError::EmptyExpression);
    }

    let Some((left, connective, right)) = split_first_connective(body) else {
        return Ok(vec![Term::Clause(Clause::parse(body)?)]);
    };
    trace!(left, ?connective, right, parens, "split filter expression");

    let mut terms = Vec::new();
    if parens {
        terms.push(Term::OpenParen);
    }
    terms.extend(parse_terms(left)?);
    terms.push(connective.into());
    terms.extend(parse_terms(right)?);
    if parens {
        terms.push(Term::CloseParen);
    }
    Ok(terms)
}

/// Returns the inside of `text` if its first `(` is closed by its last `)`.
///
/// Parentheses inside quoted literals are not counted. As in the clause
/// lexer, a quote opens a literal only at the start of a token, so the
/// apostrophe in `O'Brien` is an ordinary character.
fn strip_outer_parens(text: &str) -> Option<&str> {
    if text.len() < 2 || !text.starts_with('(') || !text.ends_with(')') {
        return None;
    }

    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut token_start = true;
    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        let at_token_start = token_start;
        token_start = c.is_whitespace();
        match c {
            '"' | '\'' if at_token_start => quote = Some(c),
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return (i == text.len() - 1).then(|| &text[1..i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Splits at the leftmost `" and "` or `" or "`.
fn split_first_connective(text: &str) -> Option<(&str, Connective, &str)> {
    let and = text.find(" and ").map(|i| (i, Connective::And));
    let or = text.find(" or ").map(|i| (i, Connective::Or));

    let (index, connective) = match (and, or) {
        (Some(a), Some(o)) => {
            if a.0 <= o.0 {
                a
            } else {
                o
            }
        }
        (a, o) => a.or(o)?,
    };

    let separator_len = connective.keyword().len() + 2;
    Some((
        &text[..index],
        connective,
        &text[index + separator_len..],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_outer_parens_matching_pair() {
        assert_eq!(strip_outer_parens("(a eq 1)"), Some("a eq 1"));
        assert_eq!(strip_outer_parens("((a eq 1))"), Some("(a eq 1)"));
    }

    #[test]
    fn test_strip_outer_parens_non_matching_pair() {
        assert_eq!(strip_outer_parens("(a eq 1) and (b eq 2)"), None);
        assert_eq!(strip_outer_parens("a eq 1"), None);
        assert_eq!(strip_outer_parens("()"), Some(""));
        assert_eq!(strip_outer_parens("(a eq 1"), None);
    }

    #[test]
    fn test_strip_outer_parens_ignores_quoted_parens() {
        assert_eq!(
            strip_outer_parens(r#"(cn eq ")" and b eq 2)"#),
            Some(r#"cn eq ")" and b eq 2"#)
        );
        assert_eq!(
            strip_outer_parens(r#"(cn eq "\")")"#),
            Some(r#"cn eq "\")""#)
        );
    }

    #[test]
    fn test_strip_outer_parens_apostrophe_inside_word() {
        assert_eq!(
            strip_outer_parens("(name eq O'Brien and x eq 1)"),
            Some("name eq O'Brien and x eq 1")
        );
        assert_eq!(
            strip_outer_parens(r#"(a eq it"s)"#),
            Some(r#"a eq it"s"#)
        );
    }

    #[test]
    fn test_strip_outer_parens_quote_after_whitespace_still_opens_literal() {
        // The `)` inside the literal does not close the group.
        assert_eq!(strip_outer_parens("(a eq ')' )"), Some("a eq ')' "));
        assert_eq!(strip_outer_parens("(a eq ')"), None);
    }

    #[test]
    fn test_parse_terms_apostrophe_inside_word() {
        let terms = parse_terms("(name eq O'Brien and x eq 1)").unwrap();
        assert_eq!(terms.len(), 5);
        assert_eq!(terms[0], Term::OpenParen);
        assert_eq!(
            terms[1],
            Term::Clause(Clause::parse("name eq O'Brien").unwrap())
        );
        assert_eq!(terms[1].as_clause().unwrap().field(), "name");
        assert_eq!(terms[4], Term::CloseParen);
    }

    #[test]
    fn test_split_first_connective_leftmost() {
        assert_eq!(
            split_first_connective("a eq 1 or b eq 2 and c eq 3"),
            Some(("a eq 1", Connective::Or, "b eq 2 and c eq 3"))
        );
        assert_eq!(
            split_first_connective("a eq 1 and b eq 2 or c eq 3"),
            Some(("a eq 1", Connective::And, "b eq 2 or c eq 3"))
        );
        assert_eq!(split_first_connective("a eq 1"), None);
    }

    #[test]
    fn test_split_is_case_sensitive() {
        assert_eq!(split_first_connective("a eq 1 AND b eq 2"), None);
    }

    #[test]
    fn test_parse_terms_empty() {
        assert_eq!(parse_terms("   "), Err(FilterError::EmptyExpression));
    }

    #[test]
    fn test_parse_terms_empty_parens() {
        assert_eq!(parse_terms("( )"), Err(FilterError::EmptyExpression));
    }
}
