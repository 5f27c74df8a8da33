//! Q objects for query filtering.
//!
//! Q objects combine with AND, OR and NOT. Field names stay unresolved
//! until the query is rendered, so the same filter can be qualified or not
//! depending on whether raw SQL takes part in the statement.

use std::convert::Infallible;
use std::fmt;

use oxide_finder_core::{SqlValue, ToSqlValue};

/// A filter expression that can be combined with other expressions.
///
/// # Example
///
/// ```rust
/// use oxide_finder_orm::Q;
///
/// let filter = Q::eq("role", "Manager")
///     .and(Q::gt("age", 18).or(Q::is_null("deleted_at")));
/// let (sql, params) = filter.build();
///
/// assert_eq!(sql, "(role = ?) AND ((age > ?) OR (deleted_at IS NULL))");
/// assert_eq!(params.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Q {
    expr: FilterExpr,
}

/// Filter expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    /// Simple comparison: field op value
    Comparison {
        field: String,
        op: CompareOp,
        value: SqlValue,
    },
    /// IS NULL check
    IsNull { field: String },
    /// IS NOT NULL check
    IsNotNull { field: String },
    /// IN list check
    InList {
        field: String,
        values: Vec<SqlValue>,
    },
    /// LIKE pattern match
    Like { field: String, pattern: String },
    /// BETWEEN range check
    Between {
        field: String,
        low: SqlValue,
        high: SqlValue,
    },
    /// AND combination
    And(Box<FilterExpr>, Box<FilterExpr>),
    /// OR combination
    Or(Box<FilterExpr>, Box<FilterExpr>),
    /// NOT negation
    Not(Box<FilterExpr>),
    /// Raw SQL expression, copied verbatim.
    Raw { sql: String, params: Vec<SqlValue> },
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Equal (=)
    Eq,
    /// Not equal (!=)
    Ne,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Gte,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Lte,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq => write!(f, "="),
            Self::Ne => write!(f, "!="),
            Self::Gt => write!(f, ">"),
            Self::Gte => write!(f, ">="),
            Self::Lt => write!(f, "<"),
            Self::Lte => write!(f, "<="),
        }
    }
}

impl Q {
    fn compare<V: ToSqlValue>(field: &str, op: CompareOp, value: V) -> Self {
        Self {
            expr: FilterExpr::Comparison {
                field: field.to_string(),
                op,
                value: value.to_sql_value(),
            },
        }
    }

    /// Creates an equality filter (field = value).
    pub fn eq<V: ToSqlValue>(field: &str, value: V) -> Self {
        Self::compare(field, CompareOp::Eq, value)
    }

    /// Creates an inequality filter (field != value).
    pub fn ne<V: ToSqlValue>(field: &str, value: V) -> Self {
        Self::compare(field, CompareOp::Ne, value)
    }

    /// Creates a greater-than filter (field > value).
    pub fn gt<V: ToSqlValue>(field: &str, value: V) -> Self {
        Self::compare(field, CompareOp::Gt, value)
    }

    /// Creates a greater-than-or-equal filter (field >= value).
    pub fn gte<V: ToSqlValue>(field: &str, value: V) -> Self {
        Self::compare(field, CompareOp::Gte, value)
    }

    /// Creates a less-than filter (field < value).
    pub fn lt<V: ToSqlValue>(field: &str, value: V) -> Self {
        Self::compare(field, CompareOp::Lt, value)
    }

    /// Creates a less-than-or-equal filter (field <= value).
    pub fn lte<V: ToSqlValue>(field: &str, value: V) -> Self {
        Self::compare(field, CompareOp::Lte, value)
    }

    /// Creates an IS NULL filter.
    pub fn is_null(field: &str) -> Self {
        Self {
            expr: FilterExpr::IsNull {
                field: field.to_string(),
            },
        }
    }

    /// Creates an IS NOT NULL filter.
    pub fn is_not_null(field: &str) -> Self {
        Self {
            expr: FilterExpr::IsNotNull {
                field: field.to_string(),
            },
        }
    }

    /// Creates an IN list filter.
    pub fn in_list<V: ToSqlValue>(field: &str, values: Vec<V>) -> Self {
        Self {
            expr: FilterExpr::InList {
                field: field.to_string(),
                values: values.into_iter().map(ToSqlValue::to_sql_value).collect(),
            },
        }
    }

    /// Creates a LIKE filter. Use `%` for wildcard matching.
    pub fn like(field: &str, pattern: &str) -> Self {
        Self {
            expr: FilterExpr::Like {
                field: field.to_string(),
                pattern: pattern.to_string(),
            },
        }
    }

    /// Creates a BETWEEN filter (low <= field <= high).
    pub fn between<V: ToSqlValue>(field: &str, low: V, high: V) -> Self {
        Self {
            expr: FilterExpr::Between {
                field: field.to_string(),
                low: low.to_sql_value(),
                high: high.to_sql_value(),
            },
        }
    }

    /// Creates a raw SQL filter expression.
    ///
    /// **Warning**: Use parameterized values to prevent SQL injection.
    pub fn raw(sql: &str, params: Vec<SqlValue>) -> Self {
        Self {
            expr: FilterExpr::Raw {
                sql: sql.to_string(),
                params,
            },
        }
    }

    /// Combines this filter with another using AND.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        Self {
            expr: FilterExpr::And(Box::new(self.expr), Box::new(other.expr)),
        }
    }

    /// Combines this filter with another using OR.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self {
            expr: FilterExpr::Or(Box::new(self.expr), Box::new(other.expr)),
        }
    }

    /// Negates this filter with NOT.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self {
            expr: FilterExpr::Not(Box::new(self.expr)),
        }
    }

    /// Returns the internal filter expression.
    pub fn into_expr(self) -> FilterExpr {
        self.expr
    }

    /// Builds the predicate with field names written as given.
    pub fn build(&self) -> (String, Vec<SqlValue>) {
        let verbatim = |field: &str| Ok::<_, Infallible>(field.to_string());
        match self.expr.render(&verbatim) {
            Ok(built) => built,
            Err(never) => match never {},
        }
    }
}

impl From<Q> for FilterExpr {
    fn from(q: Q) -> Self {
        q.expr
    }
}

impl FilterExpr {
    /// Renders the predicate, mapping each field name through `resolve`.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `resolve`.
    pub fn render<F, E>(&self, resolve: &F) -> Result<(String, Vec<SqlValue>), E>
    where
        F: Fn(&str) -> Result<String, E>,
    {
        let built = match self {
            Self::Comparison { field, op, value } => {
                (format!("{} {op} ?", resolve(field)?), vec![value.clone()])
            }
            Self::IsNull { field } => (format!("{} IS NULL", resolve(field)?), vec![]),
            Self::IsNotNull { field } => (format!("{} IS NOT NULL", resolve(field)?), vec![]),
            Self::InList { field, values } => {
                let placeholders: Vec<&str> = values.iter().map(|_| "?").collect();
                (
                    format!("{} IN ({})", resolve(field)?, placeholders.join(", ")),
                    values.clone(),
                )
            }
            Self::Like { field, pattern } => (
                format!("{} LIKE ?", resolve(field)?),
                vec![SqlValue::Text(pattern.clone())],
            ),
            Self::Between { field, low, high } => (
                format!("{} BETWEEN ? AND ?", resolve(field)?),
                vec![low.clone(), high.clone()],
            ),
            Self::And(left, right) => {
                let (left_sql, mut params) = left.render(resolve)?;
                let (right_sql, right_params) = right.render(resolve)?;
                params.extend(right_params);
                (format!("({left_sql}) AND ({right_sql})"), params)
            }
            Self::Or(left, right) => {
                let (left_sql, mut params) = left.render(resolve)?;
                let (right_sql, right_params) = right.render(resolve)?;
                params.extend(right_params);
                (format!("({left_sql}) OR ({right_sql})"), params)
            }
            Self::Not(inner) => {
                let (inner_sql, params) = inner.render(resolve)?;
                (format!("NOT ({inner_sql})"), params)
            }
            Self::Raw { sql, params } => (sql.clone(), params.clone()),
        };
        Ok(built)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrmError;

    #[test]
    fn test_simple_eq() {
        let (sql, params) = Q::eq("role", "Manager").build();
        assert_eq!(sql, "role = ?");
        assert_eq!(params, vec![SqlValue::Text(String::from("Manager"))]);
    }

    #[test]
    fn test_or_combination() {
        let q = Q::eq("role", "admin").or(Q::eq("role", "moderator"));
        let (sql, params) = q.build();
        assert_eq!(sql, "(role = ?) OR (role = ?)");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_not() {
        let (sql, params) = Q::ne("role", "guest").not().build();
        assert_eq!(sql, "NOT (role != ?)");
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_in_list_and_between() {
        let (sql, params) = Q::in_list("id", vec![1, 2, 3]).build();
        assert_eq!(sql, "id IN (?, ?, ?)");
        assert_eq!(params.len(), 3);

        let (sql, params) = Q::between("id", 10, 20).build();
        assert_eq!(sql, "id BETWEEN ? AND ?");
        assert_eq!(params, vec![SqlValue::Int(10), SqlValue::Int(20)]);
    }

    #[test]
    fn test_like_binds_pattern() {
        let (sql, params) = Q::like("username", "J%").build();
        assert_eq!(sql, "username LIKE ?");
        assert_eq!(params, vec![SqlValue::Text(String::from("J%"))]);
    }

    #[test]
    fn test_raw_is_verbatim() {
        let q = Q::raw("LENGTH(username) > ?", vec![SqlValue::Int(3)]).and(Q::is_not_null("role"));
        let (sql, params) = q.build();
        assert_eq!(sql, "(LENGTH(username) > ?) AND (role IS NOT NULL)");
        assert_eq!(params, vec![SqlValue::Int(3)]);
    }

    #[test]
    fn test_render_resolves_fields() {
        let expr = Q::lte("id", 5).and(Q::gte("id", 1)).into_expr();
        let (sql, _) = expr
            .render(&|field: &str| Ok::<_, OrmError>(format!("\"t\".\"{field}\"")))
            .unwrap();
        assert_eq!(sql, r#"("t"."id" <= ?) AND ("t"."id" >= ?)"#);
    }

    #[test]
    fn test_render_propagates_resolution_errors() {
        let expr = Q::lt("age", 3).or(Q::is_null("missing")).into_expr();
        let result = expr.render(&|field: &str| {
            if field == "missing" {
                Err(OrmError::InvalidField(field.to_string()))
            } else {
                Ok(field.to_string())
            }
        });
        assert_eq!(result, Err(OrmError::InvalidField(String::from("missing"))));
    }
}
