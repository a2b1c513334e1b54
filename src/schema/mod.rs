//! Schema resolution.
//!
//! Parsers never own schema state. They ask a [`SchemaResolver`] to turn names
//! into dimensions, fields, metrics and tables, and treat a `None` answer as
//! "unknown". The resolver is passed explicitly so parsing stays deterministic
//! and testable without a live metadata service.

mod catalog;

pub use catalog::{
    DimensionDefinition, MetricDefinition, SchemaCatalog, SchemaDefinition, SchemaError,
    TableDefinition,
};

use crate::model::{Dimension, DimensionField, LogicalMetric, LogicalTable};
use std::sync::Arc;

/// Read-only lookup of schema metadata.
///
/// Implementations may be shared across threads and queried concurrently.
pub trait SchemaResolver: Send + Sync {
    /// Look up a logical table by name.
    fn resolve_table(&self, name: &str) -> Option<Arc<LogicalTable>>;

    /// Look up a dimension that is valid for `table`.
    fn resolve_dimension(&self, name: &str, table: &LogicalTable) -> Option<Arc<Dimension>>;

    /// Look up a metric that is valid for `table`.
    fn resolve_metric(&self, name: &str, table: &LogicalTable) -> Option<Arc<LogicalMetric>>;

    /// Look up a dimension without a table, for dimension value requests.
    fn resolve_dimension_by_name(&self, _name: &str) -> Option<Arc<Dimension>> {
        None
    }

    /// Table names offered as suggestions when a table is unknown.
    fn known_tables(&self) -> Vec<String> {
        Vec::new()
    }

    /// Dimension names offered as suggestions when a dimension is unknown
    /// outside any table.
    fn known_dimensions(&self) -> Vec<String> {
        Vec::new()
    }

    /// Look up a field of `dimension`, or its key field when `name` is `None`.
    fn resolve_field(&self, dimension: &Dimension, name: Option<&str>) -> Option<DimensionField> {
        match name {
            Some(name) => dimension.field(name).cloned(),
            None => Some(dimension.key_field().clone()),
        }
    }
}

/// Suggest the closest candidate to `name` by Levenshtein distance.
///
/// Returns a candidate (original casing) within an edit distance of 3, or
/// `None` when nothing is close enough. Comparison is case-insensitive.
pub fn suggest_closest<'a>(
    name: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Option<String> {
    let query = name.to_ascii_lowercase();
    let mut best: Option<(usize, &str)> = None;
    for candidate in candidates {
        let dist = strsim::levenshtein(&query, &candidate.to_ascii_lowercase());
        if dist > 3 {
            continue;
        }
        match best {
            Some((best_dist, _)) if best_dist <= dist => {}
            _ => best = Some((dist, candidate)),
        }
    }
    best.map(|(_, s)| s.to_string())
}

/// Render an optional suggestion as a message suffix.
pub(crate) fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(". Did you mean '{}'?", s),
        None => String::new(),
    }
}
