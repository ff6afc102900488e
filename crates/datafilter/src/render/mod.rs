//! Backend renderers.
//!
//! Each renderer walks a filter's terms left to right and folds them into
//! one backend's query form:
//!
//! - [`sql`] - a SQL boolean expression for a `WHERE` clause
//! - [`ldap`] - an RFC 4515 filter string
//! - [`mongo`] - a Mongo-style filter document
//!
//! In-memory evaluation lives in [`crate::evaluator`].

pub mod ldap;
pub mod mongo;
pub mod sql;

pub use sql::{SqlDialect, SqlQuoter, SqlStyle};
