use oxide_finder_core::{Model, Schema};

/// An inner join from the queried model to another model.
///
/// `source` names a property of the queried model, `target` a property of
/// the linked one. Conditions and orderings refer to the linked model's
/// properties as `<storage name>.<property>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Schema of the linked model.
    pub schema: Schema,
    /// Property of the queried model.
    pub source: String,
    /// Property of the linked model.
    pub target: String,
}

impl Link {
    /// Links to the model with the given schema.
    pub fn new(schema: Schema, source: &str, target: &str) -> Self {
        Self {
            schema,
            source: source.to_string(),
            target: target.to_string(),
        }
    }

    /// Links to `M`.
    pub fn to<M: Model>(source: &str, target: &str) -> Self {
        Self::new(M::schema(), source, target)
    }
}
