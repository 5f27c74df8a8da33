//! Model metadata consumed by table aliases and query generation.
//!
//! Usually implemented with `#[derive(Model)]` from `oxide-finder-derive`.

/// A declared property of a model and the column that stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Property {
    /// The property name used in Rust code and conditions.
    pub name: &'static str,
    /// The SQL column name.
    pub field: &'static str,
    /// Whether the property is part of the model key.
    pub key: bool,
}

impl Property {
    /// Creates a non-key property stored in a column of the same name.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            field: name,
            key: false,
        }
    }

    /// Stores the property in `field` instead.
    #[must_use]
    pub const fn field(mut self, field: &'static str) -> Self {
        self.field = field;
        self
    }

    /// Marks the property as part of the key.
    #[must_use]
    pub const fn key(mut self) -> Self {
        self.key = true;
        self
    }
}

/// Storage metadata of one model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    /// The SQL table name.
    pub storage_name: &'static str,
    /// Declared properties in declaration order.
    pub properties: &'static [Property],
    /// Names that are attributes of the model but not columns, such as
    /// values computed by a raw SELECT.
    pub computed: &'static [&'static str],
}

impl Schema {
    /// Looks up a declared property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&'static Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Returns true if `name` is a computed attribute.
    #[must_use]
    pub fn is_computed(&self, name: &str) -> bool {
        self.computed.iter().any(|computed| *computed == name)
    }

    /// Iterates over the key properties.
    pub fn key(&self) -> impl Iterator<Item = &'static Property> {
        self.properties.iter().filter(|p| p.key)
    }
}

/// A type stored in a table.
pub trait Model {
    /// The SQL table name.
    const STORAGE_NAME: &'static str;

    /// Declared properties in declaration order.
    const PROPERTIES: &'static [Property];

    /// Non-column attribute names.
    const COMPUTED: &'static [&'static str] = &[];

    /// Returns the model's storage metadata.
    #[must_use]
    fn schema() -> Schema {
        Schema {
            storage_name: Self::STORAGE_NAME,
            properties: Self::PROPERTIES,
            computed: Self::COMPUTED,
        }
    }
}
