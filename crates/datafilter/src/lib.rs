//! One filter expression, four backends.
//!
//! This crate parses a small textual filter grammar into a [`Filter`] and
//! renders it as a SQL `WHERE` expression, an LDAP filter string, or a
//! Mongo-style filter document, or evaluates it directly against in-memory
//! records.
//!
//! # Syntax
//!
//! - `field op value` - a clause; `op` is one of `eq ne gt ge lt le`
//! - `"text"` or `'text'` - a string literal
//! - `42`, `-1.5` - a number literal
//! - any other bare word - a reference to another field
//! - `clause and clause`, `clause or clause` - connectives, lowercase
//! - `( ... )` - one outer pair of parentheses is kept as a group marker
//!
//! The grammar has no precedence. Connectives are applied left to right, and
//! LDAP output cannot mix `and` with `or`.
//!
//! # Example
//!
//! ```
//! use datafilter_rs::{Connective, Filter};
//! use serde_json::json;
//!
//! let mut filter = Filter::parse(r#"uid eq "alice""#).unwrap();
//! assert_eq!(filter.to_sql(), "uid = 'alice'");
//! assert_eq!(filter.to_ldap().unwrap(), "(uid=alice)");
//! assert_eq!(filter.to_mongo_filter(), json!({"uid": "alice"}));
//!
//! filter.append_connective(Connective::And);
//! filter.append_clause_text("active eq 1").unwrap();
//! assert_eq!(filter.to_sql(), "uid = 'alice' AND active = 1");
//! ```

mod clause;
mod error;
pub mod evaluator;
mod filter;
mod lexer;
mod parser;
pub mod render;

pub use clause::{Clause, Operand, Operator};
pub use error::{FilterError, FilterResult};
pub use evaluator::{Record, Scalar};
pub use filter::{Connective, Filter, Term};
pub use render::{SqlDialect, SqlQuoter, SqlStyle};

#[cfg(test)]
mod tests;
