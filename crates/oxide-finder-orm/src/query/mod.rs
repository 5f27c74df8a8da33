//! Building blocks of a structured query.
//!
//! Filters, orderings and links refer to properties by name. They are only
//! resolved to columns by the [`SqlGenerator`](crate::SqlGenerator).

mod filter;
mod link;
mod order;

pub use filter::{CompareOp, FilterExpr, Q};
pub use link::Link;
pub use order::{OrderBy, OrderDirection};
