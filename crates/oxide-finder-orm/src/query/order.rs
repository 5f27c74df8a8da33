/// Order direction for sorting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderDirection {
    /// Ascending order, rendered without a suffix.
    #[default]
    Asc,
    /// Descending order (DESC)
    Desc,
}

/// An ordering on one property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Property to order by.
    pub field: String,
    /// Order direction
    pub direction: OrderDirection,
}

impl OrderBy {
    /// Creates an ascending order.
    pub fn asc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: OrderDirection::Asc,
        }
    }

    /// Creates a descending order.
    pub fn desc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: OrderDirection::Desc,
        }
    }

    /// Parses an order specification.
    ///
    /// Prefix with `-` for descending order: `"-role"` sorts by role
    /// descending, `"role"` ascending.
    pub fn parse(spec: &str) -> Self {
        if let Some(field) = spec.strip_prefix('-') {
            Self::desc(field)
        } else {
            Self::asc(spec)
        }
    }

    /// Renders the order for an already resolved column.
    pub fn render(&self, column: &str) -> String {
        match self.direction {
            OrderDirection::Asc => column.to_string(),
            OrderDirection::Desc => format!("{column} DESC"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_by_parsing() {
        assert_eq!(OrderBy::parse("-role"), OrderBy::desc("role"));
        assert_eq!(OrderBy::parse("role"), OrderBy::asc("role"));
    }

    #[test]
    fn test_render() {
        assert_eq!(OrderBy::asc("id").render(r#""users"."id""#), r#""users"."id""#);
        assert_eq!(OrderBy::desc("id").render(r#""id""#), r#""id" DESC"#);
    }
}
