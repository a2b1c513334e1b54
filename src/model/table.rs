// src/model/table.rs
use crate::model::dimension::Dimension;
use crate::model::time::Granularity;
use indexmap::IndexSet;
use serde::Serialize;

/// A logical table: the dimensions, metrics and granularities that are valid
/// together in one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogicalTable {
    pub name: String,
    /// Supported granularities, stored without a time zone.
    pub granularities: IndexSet<Granularity>,
    /// Names of dimensions valid for this table
    pub dimensions: IndexSet<String>,
    /// Names of metrics valid for this table
    pub metrics: IndexSet<String>,
}

impl LogicalTable {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            granularities: IndexSet::new(),
            dimensions: IndexSet::new(),
            metrics: IndexSet::new(),
        }
    }

    /// A pseudo-table exposing a single dimension, used to scope filters on
    /// dimension value requests.
    pub fn dimension_scope(dimension: &Dimension) -> Self {
        Self::new(dimension.name())
            .with_granularity(Granularity::All)
            .with_dimension(dimension.name())
    }

    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularities.insert(granularity.without_zone());
        self
    }

    pub fn with_dimension(mut self, name: &str) -> Self {
        self.dimensions.insert(name.into());
        self
    }

    pub fn with_metric(mut self, name: &str) -> Self {
        self.metrics.insert(name.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn supports_dimension(&self, name: &str) -> bool {
        self.dimensions.contains(name)
    }

    pub fn supports_metric(&self, name: &str) -> bool {
        self.metrics.contains(name)
    }

    /// Whether the table can be queried at `granularity`, ignoring its zone.
    pub fn supports_granularity(&self, granularity: &Granularity) -> bool {
        self.granularities.contains(&granularity.without_zone())
    }

    pub fn dimension_names(&self) -> impl Iterator<Item = &str> {
        self.dimensions.iter().map(String::as_str)
    }

    pub fn metric_names(&self) -> impl Iterator<Item = &str> {
        self.metrics.iter().map(String::as_str)
    }
}
