// src/model/dimension.rs
use indexmap::IndexSet;
use serde::Serialize;
use std::hash::{Hash, Hasher};

/// A named attribute of a dimension (e.g. `id`, `desc`).
///
/// Identity is the pair (dimension name, field name); the description is
/// informational only.
#[derive(Debug, Clone, Serialize)]
pub struct DimensionField {
    pub dimension: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl DimensionField {
    pub fn new(dimension: &str, name: &str) -> Self {
        Self {
            dimension: dimension.into(),
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl PartialEq for DimensionField {
    fn eq(&self, other: &Self) -> bool {
        self.dimension == other.dimension && self.name == other.name
    }
}

impl Eq for DimensionField {}

impl Hash for DimensionField {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.dimension.hash(state);
        self.name.hash(state);
    }
}

/// A categorical grouping axis (e.g. `region`).
///
/// Dimensions are compared and hashed by name only. The key field is always
/// the first entry of `fields` and is used when a filter omits the field.
#[derive(Debug, Clone, Serialize)]
pub struct Dimension {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    key_field: String,
    fields: IndexSet<DimensionField>,
}

impl Dimension {
    /// Create a dimension whose only field is its key field.
    pub fn new(name: &str, key_field: &str) -> Self {
        let mut fields = IndexSet::new();
        fields.insert(DimensionField::new(name, key_field));
        Self {
            name: name.into(),
            description: None,
            key_field: key_field.into(),
            fields,
        }
    }

    /// Add a field. Adding an existing field is a no-op.
    pub fn with_field(mut self, field: &str) -> Self {
        self.fields.insert(DimensionField::new(&self.name, field));
        self
    }

    pub fn with_fields<'a>(self, fields: impl IntoIterator<Item = &'a str>) -> Self {
        fields.into_iter().fold(self, Dimension::with_field)
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The field used when a reference does not name one.
    pub fn key_field(&self) -> &DimensionField {
        // Invariant: the key field is inserted by `new` and never removed.
        &self.fields[0]
    }

    pub fn key_field_name(&self) -> &str {
        &self.key_field
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&DimensionField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn fields(&self) -> impl Iterator<Item = &DimensionField> {
        self.fields.iter()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

impl PartialEq for Dimension {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Dimension {}

impl Hash for Dimension {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}
