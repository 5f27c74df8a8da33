//! Chainable queries, optionally seeded with hand-written SQL.
//!
//! A query built with [`Query::by_sql`] keeps the raw statement and merges
//! everything added later into it: filters extend the raw WHERE, an explicit
//! order replaces the raw ORDER BY, limit and offset override raw values.

use std::marker::PhantomData;

use oxide_finder_core::{
    build_raw_fragment, merge, Dialect, GeneratedFragments, MergeOptions, Model, OrderIntent,
    ParsedStatement, RawSql, Schema, SqlValue, TableAlias,
};
use tracing::trace;

use crate::error::Result;
use crate::generator::SqlGenerator;
use crate::query::{FilterExpr, Link, OrderBy, Q};

/// A chainable SELECT query on the model `M`.
///
/// # Example
///
/// ```rust
/// use oxide_finder_core::{GenericDialect, Model, Property};
/// use oxide_finder_orm::{Q, Query};
///
/// struct User;
///
/// impl Model for User {
///     const STORAGE_NAME: &'static str = "users";
///     const PROPERTIES: &'static [Property] =
///         &[Property::new("id").key(), Property::new("role")];
/// }
///
/// let (sql, values) = Query::<User>::by_sql(&GenericDialect, &[], |t| {
///     let u = &t[0];
///     Ok(format!("SELECT {} FROM {u} WHERE {} <> 'guest'", u.all(), u.col("role")?))
/// })
/// .unwrap()
/// .filter(Q::gt("id", 10))
/// .limit(5)
/// .select_statement(&GenericDialect)
/// .unwrap();
///
/// assert_eq!(
///     sql,
///     r#"SELECT "users"."id", "users"."role" FROM "users" WHERE "users"."role" <> 'guest' AND "users"."id" > ? ORDER BY "users"."id" LIMIT ?"#
/// );
/// assert_eq!(values.len(), 2);
/// ```
#[derive(Debug)]
pub struct Query<M: Model> {
    /// Filter expressions (combined with AND)
    filters: Vec<FilterExpr>,
    /// Explicit ordering
    order_by: Vec<OrderBy>,
    limit: Option<u64>,
    offset: Option<u64>,
    /// Group by every selected column
    unique: bool,
    links: Vec<Link>,
    /// Properties to select (None = all)
    only: Option<Vec<String>>,
    raw: Option<RawSql>,
    _marker: PhantomData<M>,
}

// Manual Clone implementation to avoid M: Clone bound
impl<M: Model> Clone for Query<M> {
    fn clone(&self) -> Self {
        Self {
            filters: self.filters.clone(),
            order_by: self.order_by.clone(),
            limit: self.limit,
            offset: self.offset,
            unique: self.unique,
            links: self.links.clone(),
            only: self.only.clone(),
            raw: self.raw.clone(),
            _marker: PhantomData,
        }
    }
}

impl<M: Model> Default for Query<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> Query<M> {
    /// Creates a query on every row of the model's table.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            unique: false,
            links: Vec::new(),
            only: None,
            raw: None,
            _marker: PhantomData,
        }
    }

    /// Creates a query from hand-written SQL.
    ///
    /// `callback` receives a [`TableAlias`] for `M` followed by one for each
    /// schema in `additional`. Use the same dialect for
    /// [`select_statement`](Self::select_statement).
    ///
    /// # Errors
    ///
    /// Propagates any error returned by the callback.
    pub fn by_sql<F, R>(dialect: &dyn Dialect, additional: &[Schema], callback: F) -> Result<Self>
    where
        F: FnOnce(&[TableAlias<'_>]) -> oxide_finder_core::Result<R>,
        R: Into<RawSql>,
    {
        let mut schemas = vec![M::schema()];
        schemas.extend_from_slice(additional);
        let raw = build_raw_fragment(dialect, &schemas, callback)?;
        Ok(Self {
            raw: Some(raw),
            ..Self::new()
        })
    }

    /// Adds a filter. Multiple filters are combined with AND, and with the
    /// WHERE clause of raw SQL.
    #[must_use]
    pub fn filter(mut self, q: Q) -> Self {
        self.filters.push(q.into_expr());
        self
    }

    /// Adds an ordering. Use a `-` prefix for descending order.
    ///
    /// Any explicit ordering replaces the ORDER BY of raw SQL.
    #[must_use]
    pub fn order_by(mut self, spec: &str) -> Self {
        self.order_by.push(OrderBy::parse(spec));
        self
    }

    /// Limits the number of results.
    #[must_use]
    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Sets the offset for pagination.
    #[must_use]
    pub fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Groups by every selected column, unless raw SQL has a GROUP BY.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Joins another model.
    #[must_use]
    pub fn link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    /// Selects only the given properties.
    #[must_use]
    pub fn only(mut self, fields: &[&str]) -> Self {
        self.only = Some(fields.iter().map(ToString::to_string).collect());
        self
    }

    /// Returns where the ORDER BY of the statement comes from.
    pub fn order_intent(&self) -> OrderIntent {
        if !self.order_by.is_empty() {
            OrderIntent::ExplicitlyRequested
        } else if M::schema().key().next().is_some() {
            OrderIntent::DefaultedFromKey
        } else {
            OrderIntent::Unspecified
        }
    }

    /// Returns the output names of the rows this query produces.
    ///
    /// Raw SQL decides when its select list can be read; otherwise these are
    /// the selected property names.
    pub fn field_names(&self) -> Vec<String> {
        if let Some(raw) = &self.raw {
            if let Some(fields) = raw.parse().fields() {
                return fields.to_vec();
            }
        }
        self.selected()
            .into_iter()
            .map(ToString::to_string)
            .collect()
    }

    /// Builds the SELECT statement and its bind values.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::InvalidField`](crate::OrmError::InvalidField) if a
    /// filter, ordering, link or selected field names an unknown property.
    pub fn select_statement(&self, dialect: &dyn Dialect) -> Result<(String, Vec<SqlValue>)> {
        let schema = M::schema();
        let qualified = self.raw.is_some() || !self.links.is_empty();
        trace!(
            model = schema.storage_name,
            qualified,
            links = self.links.len(),
            "generating select statement"
        );

        let generator = SqlGenerator::new(dialect, schema).with_links(&self.links);
        let columns = generator.columns(&self.selected(), qualified)?;
        let (condition, condition_values) = generator.condition(&self.filters, qualified)?;

        let mut generated = GeneratedFragments::new(columns.clone(), generator.table(&schema))
            .condition(condition, condition_values);
        if !self.links.is_empty() {
            generated = generated.joins(generator.join(&self.links, qualified)?);
        }
        if self.unique {
            generated = generated.group_by(columns);
        }
        let order = self.effective_order();
        if !order.is_empty() {
            generated = generated.order(generator.order(&order, qualified)?);
        }

        let options = MergeOptions {
            order_intent: self.order_intent(),
            limit: self.limit,
            offset: self.offset,
        };
        let (parsed, raw_values) = match &self.raw {
            Some(raw) => (raw.parse(), raw.bind_values.as_slice()),
            None => (ParsedStatement::default(), &[][..]),
        };
        Ok(merge(&parsed, raw_values, &generated, &options))
    }

    fn selected(&self) -> Vec<&str> {
        match &self.only {
            Some(fields) => fields.iter().map(String::as_str).collect(),
            None => M::PROPERTIES.iter().map(|p| p.name).collect(),
        }
    }

    fn effective_order(&self) -> Vec<OrderBy> {
        if self.order_by.is_empty() {
            M::schema().key().map(|p| OrderBy::asc(p.name)).collect()
        } else {
            self.order_by.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrmError;
    use oxide_finder_core::{FinderError, GenericDialect, Property};

    struct User;

    impl Model for User {
        const STORAGE_NAME: &'static str = "users";
        const PROPERTIES: &'static [Property] = &[
            Property::new("id").key(),
            Property::new("username"),
            Property::new("role"),
        ];
    }

    struct Event;

    impl Model for Event {
        const STORAGE_NAME: &'static str = "events";
        const PROPERTIES: &'static [Property] = &[Property::new("name")];
    }

    #[test]
    fn test_basic_select() {
        let (sql, params) = Query::<User>::new()
            .select_statement(&GenericDialect)
            .unwrap();
        assert_eq!(
            sql,
            r#"SELECT "id", "username", "role" FROM "users" ORDER BY "id""#
        );
        assert!(params.is_empty());
    }

    #[test]
    fn test_select_with_filters() {
        let (sql, params) = Query::<User>::new()
            .filter(Q::eq("role", "Manager"))
            .filter(Q::ne("username", "Jim"))
            .select_statement(&GenericDialect)
            .unwrap();
        assert_eq!(
            sql,
            r#"SELECT "id", "username", "role" FROM "users" WHERE ("role" = ?) AND ("username" != ?) ORDER BY "id""#
        );
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_select_with_order_limit_offset() {
        let (sql, params) = Query::<User>::new()
            .order_by("-role")
            .limit(10)
            .offset(20)
            .select_statement(&GenericDialect)
            .unwrap();
        assert_eq!(
            sql,
            r#"SELECT "id", "username", "role" FROM "users" ORDER BY "role" DESC LIMIT ? OFFSET ?"#
        );
        assert_eq!(params, vec![SqlValue::Int(10), SqlValue::Int(20)]);
    }

    #[test]
    fn test_select_only_unique() {
        let (sql, _) = Query::<User>::new()
            .only(&["role"])
            .unique()
            .select_statement(&GenericDialect)
            .unwrap();
        assert_eq!(
            sql,
            r#"SELECT "role" FROM "users" GROUP BY "role" ORDER BY "id""#
        );
    }

    #[test]
    fn test_model_without_key_has_no_default_order() {
        let query = Query::<Event>::new();
        assert_eq!(query.order_intent(), OrderIntent::Unspecified);
        let (sql, _) = query.select_statement(&GenericDialect).unwrap();
        assert_eq!(sql, r#"SELECT "name" FROM "events""#);
    }

    #[test]
    fn test_order_intent() {
        assert_eq!(
            Query::<User>::new().order_intent(),
            OrderIntent::DefaultedFromKey
        );
        assert_eq!(
            Query::<User>::new().order_by("role").order_intent(),
            OrderIntent::ExplicitlyRequested
        );
    }

    #[test]
    fn test_invalid_field() {
        let result = Query::<User>::new()
            .filter(Q::eq("email", "x"))
            .select_statement(&GenericDialect);
        assert_eq!(result, Err(OrmError::InvalidField(String::from("email"))));
    }

    #[test]
    fn test_by_sql_propagates_unknown_column() {
        let result = Query::<User>::by_sql(&GenericDialect, &[], |t| {
            Ok(format!("SELECT {} FROM {}", t[0].col("email")?, t[0]))
        });
        assert!(matches!(
            result,
            Err(OrmError::Finder(FinderError::UnknownColumn { .. }))
        ));
    }

    #[test]
    fn test_field_names() {
        assert_eq!(
            Query::<User>::new().only(&["id", "role"]).field_names(),
            vec!["id", "role"]
        );

        let query = Query::<User>::by_sql(&GenericDialect, &[], |t| {
            Ok(format!("SELECT {}, COUNT(*) AS total FROM {}", t[0].col("id")?, t[0]))
        })
        .unwrap();
        assert_eq!(query.field_names(), vec!["id", "total"]);
    }

    #[test]
    fn test_raw_sql_is_qualified() {
        let (sql, _) = Query::<User>::by_sql(&GenericDialect, &[], |t| {
            Ok(format!("SELECT {} FROM {}", t[0].all(), t[0]))
        })
        .unwrap()
        .filter(Q::is_null("role"))
        .select_statement(&GenericDialect)
        .unwrap();
        assert_eq!(
            sql,
            r#"SELECT "users"."id", "users"."username", "users"."role" FROM "users" WHERE "users"."role" IS NULL ORDER BY "users"."id""#
        );
    }
}
