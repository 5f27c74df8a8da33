//! # oxide-finder-core
//!
//! Hand-written SQL merged with generated query clauses.
//!
//! This crate provides:
//! - A delimiter-aware [`Scanner`] that walks raw SQL without being fooled by
//!   strings, quoted identifiers, parentheses or comments
//! - [`ParsedStatement::split`], which carves a raw SELECT into its
//!   top-level clauses and extracts output names and LIMIT/OFFSET values
//! - [`merge`], which combines those clauses with fragments generated by a
//!   structured query model
//! - [`TableAlias`] handles for writing the raw SQL itself
//!
//! ## Raw SQL with generated conditions
//!
//! ```rust
//! use oxide_finder_core::{
//!     merge, GeneratedFragments, MergeOptions, OrderIntent, ParsedStatement, SqlValue,
//! };
//!
//! let parsed = ParsedStatement::split(
//!     r#"SELECT "users"."id" FROM "users" WHERE "users"."role" = ?"#,
//! );
//! let generated = GeneratedFragments::new(r#""users"."id""#, r#""users""#)
//!     .condition(r#""users"."username" = ?"#, vec![SqlValue::from("Jim")])
//!     .order(r#""users"."id""#);
//! let options = MergeOptions::new().order_intent(OrderIntent::DefaultedFromKey);
//!
//! let (sql, values) = merge(&parsed, &[SqlValue::from("Manager")], &generated, &options);
//!
//! assert_eq!(
//!     sql,
//!     r#"SELECT "users"."id" FROM "users" WHERE "users"."role" = ? AND "users"."username" = ? ORDER BY "users"."id""#
//! );
//! assert_eq!(values, vec![SqlValue::from("Manager"), SqlValue::from("Jim")]);
//! ```

pub mod clause;
pub mod dialect;
mod error;
pub mod fields;
pub mod limit;
pub mod merge;
pub mod scanner;
pub mod schema;
pub mod statement;
pub mod table;
pub mod value;

pub use clause::ClauseKey;
pub use dialect::{Dialect, GenericDialect, MySqlDialect};
pub use error::{FinderError, Result};
pub use fields::extract_fields;
pub use limit::LimitOffset;
pub use merge::{merge, GeneratedFragments, MergeOptions, OrderIntent};
pub use scanner::{Scanner, Terminal};
pub use schema::{Model, Property, Schema};
pub use statement::ParsedStatement;
pub use table::{build_raw_fragment, RawSql, TableAlias};
pub use value::{SqlValue, ToSqlValue};

/// Splits raw SQL into clause fragments. Shorthand for
/// [`ParsedStatement::split`].
#[must_use]
pub fn split(raw: &str) -> ParsedStatement {
    ParsedStatement::split(raw)
}
