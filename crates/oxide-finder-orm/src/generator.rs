//! Clause text generated from a structured query.
//!
//! Every method takes a `qualified` flag. Qualified references are written
//! as `"table"."column"`, which is required as soon as raw SQL or a join
//! brings more than one table into the statement.

use oxide_finder_core::{Dialect, Schema, SqlValue};

use crate::error::{OrmError, Result};
use crate::query::{FilterExpr, Link, OrderBy};

/// Renders columns, conditions, joins and orderings for one base model and
/// the models linked to it.
pub struct SqlGenerator<'d> {
    dialect: &'d dyn Dialect,
    base: Schema,
    linked: Vec<Schema>,
}

impl<'d> SqlGenerator<'d> {
    /// Creates a generator for queries on `base`.
    pub fn new(dialect: &'d dyn Dialect, base: Schema) -> Self {
        Self {
            dialect,
            base,
            linked: Vec::new(),
        }
    }

    /// Makes the properties of linked models resolvable as
    /// `<storage name>.<property>`.
    #[must_use]
    pub fn with_links(mut self, links: &[Link]) -> Self {
        self.linked.extend(links.iter().map(|link| link.schema));
        self
    }

    /// Returns the quoted table name of `schema`.
    pub fn table(&self, schema: &Schema) -> String {
        self.dialect.quote_identifier(schema.storage_name)
    }

    /// Resolves a property reference to its column.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::InvalidField`] for a name that is not a property
    /// of the base model or of a linked model.
    pub fn resolve(&self, name: &str, qualified: bool) -> Result<String> {
        let invalid = || OrmError::InvalidField(name.to_string());
        let (schema, property) = match name.split_once('.') {
            Some((storage, property)) => {
                (self.schema_named(storage).ok_or_else(invalid)?, property)
            }
            None => (&self.base, name),
        };
        let property = schema.property(property).ok_or_else(invalid)?;
        Ok(self.column(schema, property.field, qualified))
    }

    /// Renders the comma-separated column list for `fields`.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::InvalidField`] for an unknown property.
    pub fn columns(&self, fields: &[&str], qualified: bool) -> Result<String> {
        let columns = fields
            .iter()
            .map(|field| self.resolve(field, qualified))
            .collect::<Result<Vec<_>>>()?;
        Ok(columns.join(", "))
    }

    /// Renders the conditions joined with AND, and their bind values.
    ///
    /// A single condition is rendered bare; with several, each one is
    /// parenthesized.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::InvalidField`] for an unknown property.
    pub fn condition(
        &self,
        conditions: &[FilterExpr],
        qualified: bool,
    ) -> Result<(String, Vec<SqlValue>)> {
        let resolve = |field: &str| self.resolve(field, qualified);
        let mut parts = Vec::new();
        let mut params = Vec::new();
        for condition in conditions {
            let (sql, condition_params) = condition.render(&resolve)?;
            parts.push(sql);
            params.extend(condition_params);
        }
        let sql = if parts.len() > 1 {
            parts
                .iter()
                .map(|part| format!("({part})"))
                .collect::<Vec<_>>()
                .join(" AND ")
        } else {
            parts.concat()
        };
        Ok((sql, params))
    }

    /// Renders one `INNER JOIN` per link.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::InvalidField`] if either side of a link is not a
    /// property of its model.
    pub fn join(&self, links: &[Link], qualified: bool) -> Result<String> {
        let joins = links
            .iter()
            .map(|link| {
                let source = self.resolve(&link.source, qualified)?;
                let target = link
                    .schema
                    .property(&link.target)
                    .ok_or_else(|| {
                        OrmError::InvalidField(format!(
                            "{}.{}",
                            link.schema.storage_name, link.target
                        ))
                    })?;
                Ok(format!(
                    "INNER JOIN {} ON {source} = {}",
                    self.table(&link.schema),
                    self.column(&link.schema, target.field, qualified)
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(joins.join(" "))
    }

    /// Renders the comma-separated ORDER BY columns.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::InvalidField`] for an unknown property.
    pub fn order(&self, order: &[OrderBy], qualified: bool) -> Result<String> {
        let columns = order
            .iter()
            .map(|o| Ok(o.render(&self.resolve(&o.field, qualified)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(columns.join(", "))
    }

    fn schema_named(&self, storage_name: &str) -> Option<&Schema> {
        std::iter::once(&self.base)
            .chain(&self.linked)
            .find(|schema| schema.storage_name == storage_name)
    }

    fn column(&self, schema: &Schema, field: &str, qualified: bool) -> String {
        let column = self.dialect.quote_identifier(field);
        if qualified {
            format!("{}.{column}", self.table(schema))
        } else {
            column
        }
    }
}
