//! Mongo-style filter document rendering.
//!
//! Connectives fold pairwise: `a and b and c` becomes
//! `{"$and": [{"$and": [a, b]}, c]}`, never a flat three-element list.

use serde_json::{Map, Number, Value};
use tracing::trace;

use crate::clause::{Clause, Operand, Operator};
use crate::filter::{Connective, Filter, Term};

fn connective_key(connective: Connective) -> &'static str {
    match connective {
        Connective::And => "$and",
        Connective::Or => "$or",
    }
}

/// Converts a number literal to a JSON number, integers first.
fn number_value(raw: &str) -> Value {
    if let Ok(n) = raw.parse::<i64>() {
        return Value::from(n);
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(raw.to_string()))
}

fn single_entry(key: impl Into<String>, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.into(), value);
    Value::Object(map)
}

impl Clause {
    /// Renders this clause as a Mongo filter document.
    ///
    /// Equality uses the short `{field: value}` form. Comparing two fields
    /// needs an aggregation expression: `{"$expr": {"$op": ["$a", "$b"]}}`.
    pub fn to_mongo_filter(&self) -> Value {
        let value = match self.operand() {
            Operand::Text(text) => Value::String(text.clone()),
            Operand::Number(raw) => number_value(raw),
            Operand::Field(name) => {
                let pair = Value::Array(vec![
                    Value::String(format!("${}", self.field())),
                    Value::String(format!("${name}")),
                ]);
                return single_entry(
                    "$expr",
                    single_entry(self.operator().mongo_operator(), pair),
                );
            }
        };

        match self.operator() {
            Operator::Eq => single_entry(self.field(), value),
            op => single_entry(self.field(), single_entry(op.mongo_operator(), value)),
        }
    }
}

/// Fold state for one parenthesis level.
#[derive(Default)]
struct Frame {
    results: Vec<Value>,
    pending: Option<Connective>,
}

impl Frame {
    /// Pushes an operand, combining it with the previous result when a
    /// connective is waiting.
    fn push(&mut self, doc: Value) {
        let combined = match (self.pending.take(), self.results.pop()) {
            (Some(connective), Some(previous)) => {
                single_entry(connective_key(connective), Value::Array(vec![previous, doc]))
            }
            (_, previous) => {
                self.results.extend(previous);
                doc
            }
        };
        self.results.push(combined);
    }

    fn finish(mut self) -> Value {
        if self.results.len() == 1 {
            self.results.remove(0)
        } else {
            Value::Array(self.results)
        }
    }
}

impl Filter {
    /// Renders the filter as a Mongo-style filter document.
    ///
    /// Returns the single resulting document when the fold ends with one
    /// result, otherwise the list of results (an empty filter yields `[]`).
    /// A parenthesised run is folded on its own and then combined like a
    /// single clause. A trailing connective with nothing after it is ignored.
    pub fn to_mongo_filter(&self) -> Value {
        trace!(terms = self.terms().len(), "rendering Mongo filter");
        let mut frames = vec![Frame::default()];

        for term in self.terms() {
            match term {
                Term::Clause(clause) => push_to_top(&mut frames, clause.to_mongo_filter()),
                Term::And | Term::Or => {
                    if let Some(frame) = frames.last_mut() {
                        frame.pending = term.connective();
                    }
                }
                Term::OpenParen => frames.push(Frame::default()),
                Term::CloseParen => {
                    if frames.len() > 1 {
                        close_frame(&mut frames);
                    }
                }
            }
        }

        while frames.len() > 1 {
            close_frame(&mut frames);
        }
        frames.pop().map(Frame::finish).unwrap_or(Value::Array(Vec::new()))
    }
}

fn push_to_top(frames: &mut [Frame], doc: Value) {
    if let Some(frame) = frames.last_mut() {
        frame.push(doc);
    }
}

fn close_frame(frames: &mut Vec<Frame>) {
    if let Some(inner) = frames.pop() {
        let doc = inner.finish();
        push_to_top(frames, doc);
    }
}
