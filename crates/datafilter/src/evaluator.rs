//! In-memory evaluation of filters against records.
//!
//! A record is anything that can look up a scalar value by field name; see
//! [`Record`]. Comparison is numeric when both sides read as finite numbers
//! and a case-sensitive string comparison otherwise.
//!
//! # Example
//!
//! ```
//! use datafilter_rs::Filter;
//! use serde_json::json;
//!
//! let records = vec![json!({"uid": "alice", "age": 30}), json!({"uid": "bob", "age": 17})];
//! let filter = Filter::parse("age ge 18").unwrap();
//!
//! let adults = filter.evaluate(&records);
//! assert_eq!(adults, vec![&records[0]]);
//! ```

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use serde_json::{Map, Value};
use tracing::trace;

use crate::clause::{Clause, Operand};
use crate::filter::{Filter, Term};

/// A scalar field value read from a record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    /// A string value.
    Text(&'a str),
    /// A numeric value.
    Number(f64),
    /// A boolean value.
    Bool(bool),
}

impl Scalar<'_> {
    /// The value as a finite number, if it is one or is a string that reads
    /// as one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n).filter(|n| n.is_finite()),
            Scalar::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            Scalar::Bool(_) => None,
        }
    }

    /// The value's string form.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Scalar::Text(s) => Cow::Borrowed(s),
            Scalar::Number(n) => Cow::Owned(n.to_string()),
            Scalar::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
        }
    }

    /// Orders `self` against `other`.
    ///
    /// Returns `None` only when a numeric comparison is unordered.
    pub fn compare(&self, other: &Scalar<'_>) -> Option<Ordering> {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => Some(self.as_text().as_ref().cmp(other.as_text().as_ref())),
        }
    }
}

/// A record a filter can be evaluated against.
///
/// A field that is missing, null, or not a scalar yields `None`, and a clause
/// on such a field never matches the record.
pub trait Record {
    /// Looks up a field's scalar value.
    fn field(&self, name: &str) -> Option<Scalar<'_>>;
}

fn json_scalar(value: &Value) -> Option<Scalar<'_>> {
    match value {
        Value::String(s) => Some(Scalar::Text(s)),
        Value::Number(n) => n.as_f64().map(Scalar::Number),
        Value::Bool(b) => Some(Scalar::Bool(*b)),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

impl Record for Map<String, Value> {
    fn field(&self, name: &str) -> Option<Scalar<'_>> {
        self.get(name).and_then(json_scalar)
    }
}

/// Only JSON objects have fields; any other value matches nothing.
impl Record for Value {
    fn field(&self, name: &str) -> Option<Scalar<'_>> {
        self.as_object()?.field(name)
    }
}

impl<S: BuildHasher> Record for HashMap<String, String, S> {
    fn field(&self, name: &str) -> Option<Scalar<'_>> {
        self.get(name).map(|s| Scalar::Text(s))
    }
}

impl Record for BTreeMap<String, String> {
    fn field(&self, name: &str) -> Option<Scalar<'_>> {
        self.get(name).map(|s| Scalar::Text(s))
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, name: &str) -> Option<Scalar<'_>> {
        (**self).field(name)
    }
}

impl Clause {
    /// Returns true if the record satisfies this clause.
    ///
    /// The record must have the clause's field. A field-reference operand is
    /// read from the same record and must be present too.
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        let Some(left) = record.field(self.field()) else {
            return false;
        };
        let right = match self.operand() {
            Operand::Text(text) => Scalar::Text(text),
            Operand::Number(raw) => match raw.parse::<f64>() {
                Ok(n) => Scalar::Number(n),
                Err(_) => Scalar::Text(raw),
            },
            Operand::Field(name) => match record.field(name) {
                Some(value) => value,
                None => return false,
            },
        };
        left.compare(&right)
            .is_some_and(|ordering| self.operator().accepts(ordering))
    }
}

impl Filter {
    /// Returns the records that match, in scan order.
    ///
    /// Terms are applied left to right. A clause appends every record it
    /// matches from the current candidates. `and` narrows the candidates to
    /// the results so far and starts a fresh result list, so conjunctions
    /// intersect. `or` widens the candidates back to all records and keeps
    /// the results, so a record matched by two `or`-ed clauses appears twice.
    /// Unlike a fold that keeps accumulating across `and`, records matched
    /// before an `and` survive only if a later clause matches them again.
    /// Parenthesis markers are ignored, and an empty filter matches nothing.
    pub fn evaluate<'r, R: Record>(&self, records: &'r [R]) -> Vec<&'r R> {
        let mut matched: Vec<&'r R> = Vec::new();
        let mut candidates: Vec<&'r R> = records.iter().collect();

        for term in self.terms() {
            match term {
                Term::And => candidates = std::mem::take(&mut matched),
                Term::Or => candidates = records.iter().collect(),
                Term::OpenParen | Term::CloseParen => {}
                Term::Clause(clause) => {
                    let before = matched.len();
                    matched.extend(candidates.iter().copied().filter(|r| clause.matches(*r)));
                    trace!(clause = %clause, added = matched.len() - before, "evaluated clause");
                }
            }
        }
        matched
    }

    /// Returns true if the filter matches a single record.
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        !self.evaluate(std::slice::from_ref(record)).is_empty()
    }
}
