//! Structured filter predicates.

use indexmap::IndexSet;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::operation::{Arity, FilterOperation};
use super::FilterError;
use crate::grammar::encode_value;
use crate::model::{Dimension, DimensionField, GroupedSet};

/// Filters grouped by dimension, in first-seen dimension order.
pub type ApiFilters = GroupedSet<Arc<Dimension>, ApiFilter>;

/// A predicate over one dimension field: `dimension.field-operation[values]`.
///
/// Values are opaque strings. Two filters with the same values in a different
/// order are equal, except for operations whose value order is significant
/// (`between`).
#[derive(Debug, Clone)]
pub struct ApiFilter {
    dimension: Arc<Dimension>,
    field: DimensionField,
    operation: FilterOperation,
    values: IndexSet<String>,
}

impl ApiFilter {
    /// Build a filter, checking the value count against the operation.
    ///
    /// The count is checked as written. Duplicates then collapse, except that
    /// the two bounds of a range must differ.
    pub fn new<I, S>(
        dimension: Arc<Dimension>,
        field: DimensionField,
        operation: FilterOperation,
        values: I,
    ) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let raw: Vec<String> = values.into_iter().map(Into::into).collect();
        check_arity(operation, raw.len())?;

        let mut values = IndexSet::with_capacity(raw.len());
        for value in raw {
            if let Some(value) = values.replace(value) {
                if operation.is_ordered() {
                    return Err(FilterError::IdenticalBounds { operation, value });
                }
            }
        }
        Ok(Self {
            dimension,
            field,
            operation,
            values,
        })
    }

    pub fn dimension(&self) -> &Arc<Dimension> {
        &self.dimension
    }

    pub fn field(&self) -> &DimensionField {
        &self.field
    }

    pub fn operation(&self) -> FilterOperation {
        self.operation
    }

    pub fn values(&self) -> &IndexSet<String> {
        &self.values
    }
}

fn check_arity(operation: FilterOperation, count: usize) -> Result<(), FilterError> {
    let arity = operation.arity();
    if count < arity.min() {
        return Err(FilterError::MissingFilterValues {
            operation,
            required: arity.min(),
            actual: count,
        });
    }
    match arity.max() {
        Some(max) if count > max => Err(FilterError::FilterValueCount {
            operation,
            allowed: max,
            actual: count,
        }),
        _ => Ok(()),
    }
}

impl PartialEq for ApiFilter {
    fn eq(&self, other: &Self) -> bool {
        if self.dimension != other.dimension
            || self.field != other.field
            || self.operation != other.operation
        {
            return false;
        }
        if self.operation.is_ordered() {
            self.values.iter().eq(other.values.iter())
        } else {
            self.values == other.values
        }
    }
}

impl Eq for ApiFilter {}

impl Hash for ApiFilter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.dimension.hash(state);
        self.field.hash(state);
        self.operation.hash(state);
        let mut values: Vec<&String> = self.values.iter().collect();
        if !self.operation.is_ordered() {
            values.sort_unstable();
        }
        values.hash(state);
    }
}

/// Renders the canonical clause, which parses back to an equal filter.
impl fmt::Display for ApiFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}-{}", self.dimension.name(), self.field.name, self.operation)?;
        if self.operation.arity() == Arity::Nullary {
            return Ok(());
        }
        f.write_str("[")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(&encode_value(value))?;
        }
        f.write_str("]")
    }
}

impl Serialize for ApiFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ApiFilter", 4)?;
        state.serialize_field("dimension", self.dimension.name())?;
        state.serialize_field("field", &self.field.name)?;
        state.serialize_field("operation", &self.operation)?;
        state.serialize_field("values", &self.values)?;
        state.end()
    }
}

/// Render filters back into query form, joined by `delimiter`.
pub fn filters_to_query(filters: &ApiFilters, delimiter: char) -> String {
    filters
        .values()
        .map(ApiFilter::to_string)
        .collect::<Vec<_>>()
        .join(delimiter.to_string().as_str())
}
