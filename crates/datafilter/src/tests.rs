//! Tests for filter parsing, composition, and inspection.

use super::*;

fn clause(text: &str) -> Term {
    Term::Clause(Clause::parse(text).unwrap())
}

// ==================== Parsing Tests ====================

#[test]
fn test_parse_single_clause() {
    let filter = Filter::parse("uid eq alice").unwrap();
    assert_eq!(filter.terms(), &[clause("uid eq alice")]);
    assert_eq!(filter.source_text(), Some("uid eq alice"));
}

#[test]
fn test_parse_and() {
    let filter = Filter::parse("a eq 1 and b eq 2").unwrap();
    assert_eq!(
        filter.terms(),
        &[clause("a eq 1"), Term::And, clause("b eq 2")]
    );
}

#[test]
fn test_parse_or() {
    let filter = Filter::parse("a eq 1 or b eq 2").unwrap();
    assert_eq!(filter.terms(), &[clause("a eq 1"), Term::Or, clause("b eq 2")]);
}

#[test]
fn test_parse_keeps_source_order() {
    let filter = Filter::parse("a eq 1 or b eq 2 and c eq 3").unwrap();
    assert_eq!(
        filter.terms(),
        &[
            clause("a eq 1"),
            Term::Or,
            clause("b eq 2"),
            Term::And,
            clause("c eq 3"),
        ]
    );
}

#[test]
fn test_parse_outer_parens_kept_as_markers() {
    let filter = Filter::parse("(a eq 1 and b eq 2)").unwrap();
    assert_eq!(
        filter.terms(),
        &[
            Term::OpenParen,
            clause("a eq 1"),
            Term::And,
            clause("b eq 2"),
            Term::CloseParen,
        ]
    );
}

#[test]
fn test_parse_parens_around_single_clause_dropped() {
    let filter = Filter::parse("(a eq 1)").unwrap();
    assert_eq!(filter.terms(), &[clause("a eq 1")]);
}

#[test]
fn test_parse_separate_groups_not_stripped_as_one_pair() {
    // The first `(` closes before the end, so it is not an outer pair.
    let filter = Filter::parse("(a eq 1) and (b eq 2)").unwrap();
    assert_eq!(
        filter.terms(),
        &[clause("a eq 1"), Term::And, clause("b eq 2")]
    );
}

#[test]
fn test_parse_nested_group_on_right() {
    let filter = Filter::parse("a eq 1 or (b eq 2 and c eq 3)").unwrap();
    assert_eq!(
        filter.terms(),
        &[
            clause("a eq 1"),
            Term::Or,
            Term::OpenParen,
            clause("b eq 2"),
            Term::And,
            clause("c eq 3"),
            Term::CloseParen,
        ]
    );
}

#[test]
fn test_parse_uppercase_connective_is_not_a_connective() {
    // Connectives are case-sensitive, so "AND b eq 2" trails the value.
    assert_eq!(
        Filter::parse("a eq 1 AND b eq 2"),
        Err(FilterError::unexpected_text("a eq 1 AND b eq 2", "AND b eq 2"))
    );
}

#[test]
fn test_parse_dangling_connective_is_rejected() {
    assert_eq!(
        Filter::parse("a eq 1 and"),
        Err(FilterError::unexpected_text("a eq 1 and", "and"))
    );
    assert!(matches!(
        Filter::parse("a eq 1 and b eq 2 and"),
        Err(FilterError::UnexpectedText { .. })
    ));
}

#[test]
fn test_parse_connective_inside_literal_still_splits() {
    // The connective scan is purely textual, so the literal is cut in half.
    let filter = Filter::parse(r#"name eq "Tom and Jerry""#);
    assert!(matches!(filter, Err(FilterError::UnterminatedQuote { .. })));
}

#[test]
fn test_parse_empty() {
    assert_eq!(Filter::parse(""), Err(FilterError::EmptyExpression));
    assert_eq!(Filter::parse("  \t "), Err(FilterError::EmptyExpression));
}

#[test]
fn test_parse_missing_operator_fails_fast() {
    let err = Filter::parse("a eq 1 and nonsense").unwrap_err();
    assert!(matches!(err, FilterError::MissingOperator { ref clause, .. } if clause == "nonsense"));
}

#[test]
fn test_from_str() {
    let filter: Filter = "a eq 1".parse().unwrap();
    assert_eq!(filter.terms(), &[clause("a eq 1")]);
}

// ==================== Composition Tests ====================

#[test]
fn test_empty_filter() {
    let filter = Filter::empty();
    assert!(filter.is_empty());
    assert_eq!(filter.source_text(), None);
    assert_eq!(filter, Filter::default());
}

#[test]
fn test_build_programmatically() {
    let mut filter = Filter::empty();
    filter.append_clause_text("a eq 1").unwrap();
    filter.append_connective(Connective::Or);
    filter.push_clause(Clause::parse("b eq 2").unwrap());

    assert_eq!(filter.terms(), &[clause("a eq 1"), Term::Or, clause("b eq 2")]);
    assert_eq!(filter.to_sql(), "a = 1 OR b = 2");
}

#[test]
fn test_append_clause_text_with_connectives() {
    let mut filter = Filter::parse("a eq 1").unwrap();
    filter.append_connective(Connective::And);
    filter.append_clause_text("b eq 2 and c eq 3").unwrap();
    assert_eq!(filter.to_sql(), "a = 1 AND b = 2 AND c = 3");
}

#[test]
fn test_append_clause_text_failure_leaves_filter_unchanged() {
    let mut filter = Filter::parse("a eq 1").unwrap();
    let before = filter.clone();
    assert!(filter.append_clause_text("b eq 2 and broken").is_err());
    assert_eq!(filter, before);
}

#[test]
fn test_merge_flattens_terms() {
    let mut filter = Filter::parse("a eq 1").unwrap();
    let other = Filter::parse("(b eq 2 or c eq 3)").unwrap();

    filter.append_connective(Connective::And);
    filter.merge(&other);

    assert_eq!(
        filter.terms(),
        &[
            clause("a eq 1"),
            Term::And,
            Term::OpenParen,
            clause("b eq 2"),
            Term::Or,
            clause("c eq 3"),
            Term::CloseParen,
        ]
    );
    // The merged filter is unaffected.
    assert_eq!(other.terms().len(), 5);
}

#[test]
fn test_merge_does_not_carry_source_or_suffix() {
    let mut filter = Filter::empty();
    let mut other = Filter::parse("a eq 1").unwrap();
    other.append_raw_sql_suffix(" LIMIT 1");

    filter.merge(&other);
    assert_eq!(filter.source_text(), None);
    assert_eq!(filter.raw_sql_suffix(), "");
}

#[test]
fn test_raw_sql_suffix_accumulates() {
    let mut filter = Filter::parse("a eq 1").unwrap();
    filter.append_raw_sql_suffix(" ORDER BY a");
    filter.append_raw_sql_suffix(" LIMIT 1");
    assert_eq!(filter.to_sql(), "a = 1 ORDER BY a LIMIT 1");
}

// ==================== Inspection Tests ====================

#[test]
fn test_contains_substring_searches_source() {
    let filter = Filter::parse(r#"uid eq "alice" and active eq 1"#).unwrap();
    assert!(filter.contains_substring("alice"));
    assert!(filter.contains_substring("and active"));
    assert!(!filter.contains_substring("bob"));
}

#[test]
fn test_contains_substring_without_source_is_false() {
    let mut filter = Filter::empty();
    filter.append_clause_text("uid eq alice").unwrap();
    assert!(!filter.contains_substring("alice"));
}

#[test]
fn test_find_clause_by_field_substring() {
    let filter = Filter::parse("cn eq admins or memberUid eq uid").unwrap();

    let found = filter.find_clause_by_field_substring("member").unwrap();
    assert_eq!(found.field(), "memberUid");

    // Field-reference operands are searched too.
    let found = filter.find_clause_by_field_substring("admins").unwrap();
    assert_eq!(found.field(), "cn");

    assert!(filter.find_clause_by_field_substring("mail").is_none());
}

#[test]
fn test_find_clause_ignores_literal_operands() {
    let filter = Filter::parse(r#"cn eq "admins""#).unwrap();
    assert!(filter.find_clause_by_field_substring("admins").is_none());
    assert!(filter.find_clause_by_field_substring("c").is_some());
}

#[test]
fn test_clauses_iterator() {
    let filter = Filter::parse("(a eq 1 and b eq 2)").unwrap();
    let fields: Vec<&str> = filter.clauses().map(Clause::field).collect();
    assert_eq!(fields, vec!["a", "b"]);
}

// ==================== Display Tests ====================

#[test]
fn test_display_reparses_to_same_terms() {
    for text in [
        "a eq 1",
        "a eq 1 and b eq \"x y\"",
        "(a eq 1 or b ne c)",
        "a eq 1 or (b eq 2 and c eq 3)",
    ] {
        let filter = Filter::parse(text).unwrap();
        let reparsed = Filter::parse(&filter.to_string()).unwrap();
        assert_eq!(reparsed.terms(), filter.terms(), "round trip of {text}");
    }
}

#[test]
fn test_display_text() {
    let filter = Filter::parse("a eq 1 or (b eq 2 and c eq 3)").unwrap();
    assert_eq!(filter.to_string(), "a eq 1 or (b eq 2 and c eq 3)");
}

// ==================== Serialization Tests ====================

#[test]
fn test_terms_serialize_to_json() {
    let filter = Filter::parse(r#"uid eq "alice" or n gt 2"#).unwrap();
    let json = serde_json::to_value(filter.terms()).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {"type": "clause", "field": "uid", "operator": "eq", "operand": {"kind": "text", "value": "alice"}},
            {"type": "or"},
            {"type": "clause", "field": "n", "operator": "gt", "operand": {"kind": "number", "value": "2"}},
        ])
    );
}
