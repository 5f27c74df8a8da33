//! Table aliases handed to raw SQL callbacks.
//!
//! A raw finder receives one [`TableAlias`] per queried model and builds its
//! SQL by formatting them:
//!
//! ```rust
//! use oxide_finder_core::{build_raw_fragment, GenericDialect, Model, Property};
//!
//! struct User;
//!
//! impl Model for User {
//!     const STORAGE_NAME: &'static str = "users";
//!     const PROPERTIES: &'static [Property] =
//!         &[Property::new("id").key(), Property::new("role")];
//! }
//!
//! let raw = build_raw_fragment(&GenericDialect, &[User::schema()], |t| {
//!     let u = &t[0];
//!     Ok(format!("SELECT {} FROM {u} WHERE {} = 'admin'", u.all(), u.col("role")?))
//! })
//! .unwrap();
//!
//! assert_eq!(
//!     raw.sql,
//!     r#"SELECT "users"."id", "users"."role" FROM "users" WHERE "users"."role" = 'admin'"#
//! );
//! ```

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::dialect::Dialect;
use crate::error::{FinderError, Result};
use crate::schema::Schema;
use crate::statement::ParsedStatement;
use crate::value::{SqlValue, ToSqlValue};

/// One reference to a table inside a raw SQL fragment.
///
/// Displays as the quoted table name. The second and later references to
/// the same table get an `AS "<table>_<n>"` alias so self-joins stay
/// unambiguous.
#[derive(Clone)]
pub struct TableAlias<'d> {
    schema: Schema,
    index: usize,
    alias: Option<String>,
    dialect: &'d dyn Dialect,
}

impl<'d> TableAlias<'d> {
    /// Creates the `index`-th reference (zero-based) to `schema`.
    #[must_use]
    pub fn new(dialect: &'d dyn Dialect, schema: Schema, index: usize) -> Self {
        Self {
            schema,
            index,
            alias: None,
            dialect,
        }
    }

    /// Creates one alias per schema, numbering repeated tables in order.
    #[must_use]
    pub fn for_schemas(dialect: &'d dyn Dialect, schemas: &[Schema]) -> Vec<Self> {
        let mut seen: HashMap<&'static str, usize> = HashMap::new();
        schemas
            .iter()
            .map(|schema| {
                let count = seen.entry(schema.storage_name).or_insert(0);
                let index = *count;
                *count += 1;
                Self::new(dialect, *schema, index)
            })
            .collect()
    }

    /// Uses a custom alias, even for the first reference.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Returns the schema of the referenced table.
    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the occurrence index of this reference.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns the unquoted alias, if this reference needs one.
    #[must_use]
    pub fn alias(&self) -> Option<String> {
        match (&self.alias, self.index) {
            (Some(custom), _) => Some(custom.clone()),
            (None, 0) => None,
            (None, index) => Some(format!("{}_{index}", self.schema.storage_name)),
        }
    }

    /// Returns the quoted name columns are qualified with: the alias when
    /// there is one, otherwise the table name.
    #[must_use]
    pub fn reference(&self) -> String {
        let name = self.alias().unwrap_or_else(|| self.schema.storage_name.to_string());
        self.dialect.quote_identifier(&name)
    }

    /// Returns the qualified column of the property `name`.
    ///
    /// A computed attribute resolves to its bare quoted name.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::UnknownColumn`] if `name` is neither a declared
    /// property nor a computed attribute.
    pub fn col(&self, name: &str) -> Result<String> {
        if let Some(property) = self.schema.property(name) {
            return Ok(self.qualify(property.field));
        }
        if self.schema.is_computed(name) {
            return Ok(self.dialect.quote_identifier(name));
        }
        Err(FinderError::UnknownColumn {
            table: self.schema.storage_name.to_string(),
            name: name.to_string(),
        })
    }

    /// Returns every declared column, qualified and comma-separated.
    #[must_use]
    pub fn all(&self) -> String {
        let reference = self.reference();
        self.schema
            .properties
            .iter()
            .map(|p| format!("{reference}.{}", self.dialect.quote_identifier(p.field)))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Quotes an arbitrary identifier with this table's dialect.
    #[must_use]
    pub fn ident(&self, name: &str) -> String {
        self.dialect.quote_identifier(name)
    }

    fn qualify(&self, field: &str) -> String {
        format!("{}.{}", self.reference(), self.dialect.quote_identifier(field))
    }
}

impl fmt::Display for TableAlias<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.dialect.quote_identifier(self.schema.storage_name);
        match self.alias() {
            Some(alias) => write!(f, "{table} AS {}", self.dialect.quote_identifier(&alias)),
            None => f.write_str(&table),
        }
    }
}

impl fmt::Debug for TableAlias<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableAlias")
            .field("table", &self.schema.storage_name)
            .field("index", &self.index)
            .field("alias", &self.alias)
            .field("dialect", &self.dialect.name())
            .finish()
    }
}

/// SQL text written by hand together with its bind values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSql {
    /// The SQL text.
    pub sql: String,
    /// Values for the `?` placeholders in `sql`, in order.
    pub bind_values: Vec<SqlValue>,
}

impl RawSql {
    /// Creates raw SQL without bind values.
    #[must_use]
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            bind_values: Vec::new(),
        }
    }

    /// Appends a bind value.
    #[must_use]
    pub fn bind<V: ToSqlValue>(mut self, value: V) -> Self {
        self.bind_values.push(value.to_sql_value());
        self
    }

    /// Splits the SQL text into clause fragments.
    #[must_use]
    pub fn parse(&self) -> ParsedStatement {
        ParsedStatement::split(&self.sql)
    }
}

impl From<String> for RawSql {
    fn from(sql: String) -> Self {
        Self::new(sql)
    }
}

impl From<&str> for RawSql {
    fn from(sql: &str) -> Self {
        Self::new(sql)
    }
}

impl From<(String, Vec<SqlValue>)> for RawSql {
    fn from((sql, bind_values): (String, Vec<SqlValue>)) -> Self {
        Self { sql, bind_values }
    }
}

impl From<(&str, Vec<SqlValue>)> for RawSql {
    fn from((sql, bind_values): (&str, Vec<SqlValue>)) -> Self {
        Self {
            sql: sql.to_string(),
            bind_values,
        }
    }
}

/// Builds a raw SQL fragment by calling `callback` with one alias per
/// schema, in the order given.
///
/// # Errors
///
/// Propagates any error returned by the callback, typically an
/// [`FinderError::UnknownColumn`] from [`TableAlias::col`].
pub fn build_raw_fragment<F, R>(
    dialect: &dyn Dialect,
    schemas: &[Schema],
    callback: F,
) -> Result<RawSql>
where
    F: FnOnce(&[TableAlias<'_>]) -> Result<R>,
    R: Into<RawSql>,
{
    let tables = TableAlias::for_schemas(dialect, schemas);
    let raw: RawSql = callback(&tables)?.into();
    debug!(
        sql = %raw.sql,
        bind_count = raw.bind_values.len(),
        tables = tables.len(),
        "built raw SQL fragment"
    );
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{GenericDialect, MySqlDialect};
    use crate::schema::Property;

    const USERS: Schema = Schema {
        storage_name: "users",
        properties: &[
            Property::new("id").key(),
            Property::new("username"),
            Property::new("role").field("user_role"),
        ],
        computed: &["post_count"],
    };

    #[test]
    fn test_first_reference_has_no_alias() {
        let table = TableAlias::new(&GenericDialect, USERS, 0);
        assert_eq!(table.to_string(), r#""users""#);
        assert_eq!(table.col("id").unwrap(), r#""users"."id""#);
        assert_eq!(table.col("role").unwrap(), r#""users"."user_role""#);
    }

    #[test]
    fn test_repeated_reference_is_aliased() {
        let table = TableAlias::new(&GenericDialect, USERS, 1);
        assert_eq!(table.to_string(), r#""users" AS "users_1""#);
        assert_eq!(table.col("id").unwrap(), r#""users_1"."id""#);
    }

    #[test]
    fn test_custom_alias() {
        let table = TableAlias::new(&GenericDialect, USERS, 0).with_alias("u");
        assert_eq!(table.to_string(), r#""users" AS "u""#);
        assert_eq!(table.col("username").unwrap(), r#""u"."username""#);
    }

    #[test]
    fn test_all_columns() {
        let table = TableAlias::new(&GenericDialect, USERS, 0);
        assert_eq!(
            table.all(),
            r#""users"."id", "users"."username", "users"."user_role""#
        );
    }

    #[test]
    fn test_unknown_column_is_an_error() {
        let table = TableAlias::new(&GenericDialect, USERS, 0);
        assert_eq!(
            table.col("email"),
            Err(FinderError::UnknownColumn {
                table: String::from("users"),
                name: String::from("email"),
            })
        );
    }

    #[test]
    fn test_computed_attribute_is_bare_identifier() {
        let table = TableAlias::new(&GenericDialect, USERS, 2);
        assert_eq!(table.col("post_count").unwrap(), r#""post_count""#);
    }

    #[test]
    fn test_ident_quotes_names_outside_the_schema() {
        let table = TableAlias::new(&GenericDialect, USERS, 1);
        assert_eq!(table.ident("total"), r#""total""#);
        assert_eq!(table.ident(r#"odd"name"#), r#""odd""name""#);
        let table = TableAlias::new(&MySqlDialect, USERS, 0);
        assert_eq!(
            format!("SELECT COUNT(*) AS {} FROM {table}", table.ident("total")),
            "SELECT COUNT(*) AS `total` FROM `users`"
        );
    }

    #[test]
    fn test_for_schemas_numbers_repeats() {
        const POSTS: Schema = Schema {
            storage_name: "posts",
            properties: &[Property::new("id").key()],
            computed: &[],
        };
        let tables = TableAlias::for_schemas(&GenericDialect, &[USERS, POSTS, USERS]);
        let indices: Vec<usize> = tables.iter().map(TableAlias::index).collect();
        assert_eq!(indices, vec![0, 0, 1]);
    }

    #[test]
    fn test_mysql_dialect() {
        let table = TableAlias::new(&MySqlDialect, USERS, 1);
        assert_eq!(table.to_string(), "`users` AS `users_1`");
        assert_eq!(table.col("id").unwrap(), "`users_1`.`id`");
    }

    #[test]
    fn test_build_raw_fragment_with_bind_values() {
        let raw = build_raw_fragment(&GenericDialect, &[USERS], |t| {
            let u = &t[0];
            Ok((
                format!("SELECT {} FROM {u} WHERE {} = ?", u.col("id")?, u.col("role")?),
                vec![SqlValue::Text(String::from("Manager"))],
            ))
        })
        .unwrap();
        assert_eq!(
            raw.sql,
            r#"SELECT "users"."id" FROM "users" WHERE "users"."user_role" = ?"#
        );
        assert_eq!(raw.bind_values.len(), 1);
    }

    #[test]
    fn test_build_raw_fragment_propagates_errors() {
        let result = build_raw_fragment(&GenericDialect, &[USERS], |t| {
            Ok(format!("SELECT {} FROM {}", t[0].col("missing")?, t[0]))
        });
        assert!(matches!(result, Err(FinderError::UnknownColumn { .. })));
    }

    #[test]
    fn test_raw_sql_bind() {
        let raw = RawSql::new("SELECT 1 WHERE ? = ?").bind(1).bind("x");
        assert_eq!(
            raw.bind_values,
            vec![SqlValue::Int(1), SqlValue::Text(String::from("x"))]
        );
        assert!(raw.parse().contains(crate::ClauseKey::Select));
    }
}
