//! Merging raw clause fragments with generated ones.
//!
//! Each clause has its own precedence rule:
//!
//! | Clause   | Winner |
//! |----------|--------|
//! | SELECT   | raw, else generated columns |
//! | FROM     | raw, else generated table |
//! | JOIN     | generated only |
//! | WHERE    | raw `AND` generated when both exist |
//! | GROUP BY | raw, else generated (unique queries) |
//! | HAVING   | raw only |
//! | ORDER BY | explicit order, else raw, else key order |
//! | LIMIT    | option, else raw |
//!
//! Bind values follow the same order as their placeholders: raw values,
//! generated condition values, then limit and offset.

use tracing::{debug, warn};

use crate::clause::ClauseKey;
use crate::scanner::ends_in_line_comment;
use crate::statement::ParsedStatement;
use crate::value::SqlValue;

/// Where the ORDER BY of a query came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderIntent {
    /// The caller asked for an order; it beats any raw ORDER BY.
    ExplicitlyRequested,
    /// No order was asked for; the generated order is the model key.
    DefaultedFromKey,
    /// No order at all.
    #[default]
    Unspecified,
}

/// Clause text produced by the structured query model.
///
/// Text is stored without clause keywords; the merger adds them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedFragments {
    columns: String,
    table: String,
    joins: Option<String>,
    condition: String,
    condition_values: Vec<SqlValue>,
    group_by: Option<String>,
    order: Option<String>,
}

impl GeneratedFragments {
    /// Creates fragments with the column list and table reference every
    /// statement needs.
    #[must_use]
    pub fn new(columns: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            columns: columns.into(),
            table: table.into(),
            ..Self::default()
        }
    }

    /// Sets the join clause, e.g. `INNER JOIN "users" ON ...`.
    #[must_use]
    pub fn joins(mut self, joins: impl Into<String>) -> Self {
        self.joins = Some(joins.into());
        self
    }

    /// Sets the WHERE predicate and its bind values.
    #[must_use]
    pub fn condition(mut self, sql: impl Into<String>, values: Vec<SqlValue>) -> Self {
        self.condition = sql.into();
        self.condition_values = values;
        self
    }

    /// Sets the GROUP BY columns.
    #[must_use]
    pub fn group_by(mut self, columns: impl Into<String>) -> Self {
        self.group_by = Some(columns.into());
        self
    }

    /// Sets the ORDER BY columns.
    #[must_use]
    pub fn order(mut self, columns: impl Into<String>) -> Self {
        self.order = Some(columns.into());
        self
    }

    /// Returns the generated WHERE predicate.
    #[must_use]
    pub fn condition_sql(&self) -> &str {
        &self.condition
    }

    /// Returns the bind values of the generated WHERE predicate.
    #[must_use]
    pub fn condition_values(&self) -> &[SqlValue] {
        &self.condition_values
    }
}

/// Explicit query options that take part in the merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Decides ORDER BY precedence.
    pub order_intent: OrderIntent,
    /// Row count that overrides a raw LIMIT.
    pub limit: Option<u64>,
    /// Offset that overrides a raw OFFSET.
    pub offset: Option<u64>,
}

impl MergeOptions {
    /// Creates options with nothing requested.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the order intent.
    #[must_use]
    pub const fn order_intent(mut self, intent: OrderIntent) -> Self {
        self.order_intent = intent;
        self
    }

    /// Sets the limit override.
    #[must_use]
    pub const fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Sets the offset override.
    #[must_use]
    pub const fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }
}

fn non_empty(text: &str) -> Option<&str> {
    let text = text.trim();
    (!text.is_empty()).then_some(text)
}

/// Trims a raw fragment. A trailing `--` comment keeps a closing newline so
/// text merged after it stays live.
fn trim_raw(fragment: &str) -> String {
    let trimmed = fragment.trim();
    if ends_in_line_comment(trimmed) {
        format!("{trimmed}\n")
    } else {
        trimmed.to_string()
    }
}

/// Merges a split raw statement with generated fragments into one SQL
/// statement and its bind values.
///
/// `raw_values` are the bind values that belong to the raw SQL, in source
/// order.
///
/// A raw LIMIT only counts when it holds literal numbers. `LIMIT ?` is
/// dropped while its bind value stays in `raw_values`, so placeholders for
/// limits belong in [`MergeOptions`] instead.
#[must_use]
pub fn merge(
    parsed: &ParsedStatement,
    raw_values: &[SqlValue],
    generated: &GeneratedFragments,
    options: &MergeOptions,
) -> (String, Vec<SqlValue>) {
    let raw = |key: ClauseKey| parsed.get(key).map(trim_raw);

    let mut clauses: Vec<String> = Vec::new();
    let mut values = raw_values.to_vec();

    clauses.push(
        raw(ClauseKey::Select).unwrap_or_else(|| format!("SELECT {}", generated.columns)),
    );
    clauses.push(raw(ClauseKey::From).unwrap_or_else(|| format!("FROM {}", generated.table)));

    if let Some(joins) = generated.joins.as_deref().and_then(non_empty) {
        clauses.push(joins.to_string());
    }

    match (raw(ClauseKey::Where), non_empty(&generated.condition)) {
        (Some(raw_where), Some(condition)) => {
            clauses.push(format!("{raw_where} AND {condition}"));
        }
        (Some(raw_where), None) => clauses.push(raw_where),
        (None, Some(condition)) => clauses.push(format!("WHERE {condition}")),
        (None, None) => {}
    }
    values.extend(generated.condition_values.iter().cloned());

    if let Some(group_by) = raw(ClauseKey::GroupBy) {
        clauses.push(group_by);
    } else if let Some(columns) = generated.group_by.as_deref().and_then(non_empty) {
        clauses.push(format!("GROUP BY {columns}"));
    }

    if let Some(having) = raw(ClauseKey::Having) {
        clauses.push(having);
    }

    let generated_order = || {
        generated
            .order
            .as_deref()
            .and_then(non_empty)
            .map(|columns| format!("ORDER BY {columns}"))
    };
    let order = match (options.order_intent, raw(ClauseKey::OrderBy)) {
        (OrderIntent::ExplicitlyRequested, _) => generated_order(),
        (_, Some(raw_order)) => Some(raw_order),
        (OrderIntent::DefaultedFromKey, None) => generated_order(),
        (OrderIntent::Unspecified, None) => None,
    };
    clauses.extend(order);

    if parsed.contains(ClauseKey::LimitOffset) && parsed.limit().is_none() {
        warn!(
            fragment = parsed.get(ClauseKey::LimitOffset).unwrap_or_default(),
            "raw LIMIT without a literal row count is dropped"
        );
    }
    if let Some(limit) = options.limit.or_else(|| parsed.limit()) {
        clauses.push(String::from("LIMIT ?"));
        values.push(SqlValue::from_count(limit));
    }
    if let Some(offset) = options.offset.or_else(|| parsed.offset()) {
        clauses.push(String::from("OFFSET ?"));
        values.push(SqlValue::from_count(offset));
    }

    let sql = clauses.join(" ");
    debug!(sql = %sql, bind_count = values.len(), "merged raw SQL statement");
    (sql, values)
}
