//! # oxide-finder-orm
//!
//! A structured query model whose statements can be seeded with
//! hand-written SQL.
//!
//! This crate provides:
//! - `Q` objects for filter expressions
//! - `OrderBy` and `Link` for ordering and joins
//! - `SqlGenerator`, which renders those into clause text
//! - `Query`, which merges the generated clauses into raw SQL
//!
//! ## Raw SQL finders
//!
//! ```rust
//! use oxide_finder_core::{GenericDialect, SqlValue};
//! use oxide_finder_derive::Model;
//! use oxide_finder_orm::{Q, Query};
//!
//! #[derive(Model)]
//! #[model(table = "users")]
//! struct User {
//!     #[property(key)]
//!     id: i64,
//!     username: String,
//!     role: String,
//! }
//!
//! let managers = Query::<User>::by_sql(&GenericDialect, &[], |t| {
//!     let u = &t[0];
//!     Ok((
//!         format!("SELECT {} FROM {u} WHERE {} = ?", u.all(), u.col("role")?),
//!         vec![SqlValue::from("Manager")],
//!     ))
//! })?;
//!
//! let (sql, values) = managers
//!     .filter(Q::eq("username", "Jim"))
//!     .select_statement(&GenericDialect)?;
//!
//! assert_eq!(
//!     sql,
//!     r#"SELECT "users"."id", "users"."username", "users"."role" FROM "users" WHERE "users"."role" = ? AND "users"."username" = ? ORDER BY "users"."id""#
//! );
//! assert_eq!(values, vec![SqlValue::from("Manager"), SqlValue::from("Jim")]);
//! # Ok::<(), oxide_finder_orm::OrmError>(())
//! ```

mod error;
mod generator;
pub mod query;
mod queryset;

pub use error::{OrmError, Result};
pub use generator::SqlGenerator;
pub use query::{CompareOp, FilterExpr, Link, OrderBy, OrderDirection, Q};
pub use queryset::Query;

// Re-export commonly used types from oxide-finder-core
pub use oxide_finder_core::{Dialect, GenericDialect, Model, MySqlDialect, SqlValue, ToSqlValue};
