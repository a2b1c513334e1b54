// src/request/data.rs
use indexmap::IndexSet;
use serde::{Serialize, Serializer};
use std::num::NonZeroU32;
use std::sync::Arc;

use super::{AsyncAfter, OrderByColumn, PaginationParameters, ResponseFormat};
use crate::error::RequestError;
use crate::filter::{self, ApiFilters};
use crate::having::Havings;
use crate::model::{
    Dimension, DimensionField, GroupKey, GroupedSet, Granularity, Interval, LogicalMetric,
    LogicalTable, TimeZone,
};
use crate::schema::SchemaResolver;
use crate::validation;

/// Per-dimension field projections: which fields of each grouping dimension
/// appear in the response.
pub type DimensionFields = GroupedSet<Arc<Dimension>, DimensionField>;

// ============================================================================
// DataApiRequest
// ============================================================================

/// A fully parsed request for aggregated data.
///
/// Requests are values: every `with_*` method returns a new request and leaves
/// `self` untouched. Collections are held behind `Arc`, so a transform copies
/// only the field it replaces. Equality is structural over every field.
///
/// Per-field constraints are carried by the argument types (`Interval`,
/// `NonZeroU32`, `PaginationParameters`, parsed filters and havings).
/// Constraints spanning several fields are checked by [`validation::validate`]
/// through [`DataApiRequest::validated`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataApiRequest {
    #[serde(serialize_with = "table_name")]
    table: Arc<LogicalTable>,
    granularity: Granularity,
    #[serde(serialize_with = "names")]
    dimensions: Arc<IndexSet<Arc<Dimension>>>,
    #[serde(serialize_with = "shared")]
    dimension_fields: Arc<DimensionFields>,
    #[serde(serialize_with = "names")]
    logical_metrics: Arc<IndexSet<Arc<LogicalMetric>>>,
    #[serde(serialize_with = "shared")]
    intervals: Arc<IndexSet<Interval>>,
    #[serde(serialize_with = "shared")]
    api_filters: Arc<ApiFilters>,
    #[serde(serialize_with = "shared")]
    havings: Arc<Havings>,
    #[serde(serialize_with = "shared")]
    sorts: Arc<Vec<OrderByColumn>>,
    count: Option<NonZeroU32>,
    top_n: Option<NonZeroU32>,
    time_zone: TimeZone,
    pagination: Option<PaginationParameters>,
    format: ResponseFormat,
    async_after: AsyncAfter,
}

impl DataApiRequest {
    /// An empty request against `table` at `granularity`.
    ///
    /// The request has no intervals yet and will not validate until some are
    /// added.
    pub fn new(table: Arc<LogicalTable>, granularity: Granularity) -> Self {
        Self {
            table,
            granularity,
            dimensions: Arc::default(),
            dimension_fields: Arc::default(),
            logical_metrics: Arc::default(),
            intervals: Arc::default(),
            api_filters: Arc::default(),
            havings: Arc::default(),
            sorts: Arc::default(),
            count: None,
            top_n: None,
            time_zone: TimeZone::utc(),
            pagination: None,
            format: ResponseFormat::default(),
            async_after: AsyncAfter::default(),
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn table(&self) -> &Arc<LogicalTable> {
        &self.table
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn dimensions(&self) -> &IndexSet<Arc<Dimension>> {
        &self.dimensions
    }

    pub fn dimension_fields(&self) -> &DimensionFields {
        &self.dimension_fields
    }

    pub fn logical_metrics(&self) -> &IndexSet<Arc<LogicalMetric>> {
        &self.logical_metrics
    }

    pub fn intervals(&self) -> &IndexSet<Interval> {
        &self.intervals
    }

    pub fn api_filters(&self) -> &ApiFilters {
        &self.api_filters
    }

    /// Dimensions referenced by at least one filter, in filter order.
    pub fn filter_dimensions(&self) -> impl Iterator<Item = &Arc<Dimension>> {
        self.api_filters.keys()
    }

    pub fn havings(&self) -> &Havings {
        &self.havings
    }

    /// Sorts in priority order.
    pub fn sorts(&self) -> &[OrderByColumn] {
        &self.sorts
    }

    /// The leading sort when it orders by the time bucket.
    pub fn date_time_sort(&self) -> Option<&OrderByColumn> {
        self.sorts.first().filter(|sort| sort.column.is_date_time())
    }

    /// Sorts after the time bucket sort, if any.
    pub fn standard_sorts(&self) -> &[OrderByColumn] {
        match self.date_time_sort() {
            Some(_) => &self.sorts[1..],
            None => &self.sorts,
        }
    }

    pub fn count(&self) -> Option<NonZeroU32> {
        self.count
    }

    pub fn top_n(&self) -> Option<NonZeroU32> {
        self.top_n
    }

    pub fn time_zone(&self) -> TimeZone {
        self.time_zone
    }

    pub fn pagination(&self) -> Option<PaginationParameters> {
        self.pagination
    }

    pub fn format(&self) -> ResponseFormat {
        self.format
    }

    pub fn async_after(&self) -> AsyncAfter {
        self.async_after
    }

    /// Time zone used for bucket boundaries: the granularity's own zone if it
    /// has one, otherwise the request's.
    pub fn bucket_zone(&self) -> TimeZone {
        self.granularity.zone().unwrap_or(self.time_zone)
    }

    // ------------------------------------------------------------------------
    // Transforms
    // ------------------------------------------------------------------------

    pub fn with_table(&self, table: Arc<LogicalTable>) -> Self {
        Self {
            table,
            ..self.clone()
        }
    }

    pub fn with_granularity(&self, granularity: Granularity) -> Self {
        Self {
            granularity,
            ..self.clone()
        }
    }

    pub fn with_dimensions(&self, dimensions: impl IntoIterator<Item = Arc<Dimension>>) -> Self {
        Self {
            dimensions: Arc::new(dimensions.into_iter().collect()),
            ..self.clone()
        }
    }

    pub fn with_dimension_fields(&self, dimension_fields: DimensionFields) -> Self {
        Self {
            dimension_fields: Arc::new(dimension_fields),
            ..self.clone()
        }
    }

    pub fn with_logical_metrics(
        &self,
        metrics: impl IntoIterator<Item = Arc<LogicalMetric>>,
    ) -> Self {
        Self {
            logical_metrics: Arc::new(metrics.into_iter().collect()),
            ..self.clone()
        }
    }

    pub fn with_intervals(&self, intervals: impl IntoIterator<Item = Interval>) -> Self {
        Self {
            intervals: Arc::new(intervals.into_iter().collect()),
            ..self.clone()
        }
    }

    /// Replace the filters.
    pub fn with_filters(&self, filters: ApiFilters) -> Self {
        Self {
            api_filters: Arc::new(filters),
            ..self.clone()
        }
    }

    /// Parse `query` against this request's table and union the result into
    /// the existing filters.
    pub fn merge_filters<R>(
        &self,
        query: &str,
        resolver: &R,
        delimiter: char,
    ) -> Result<Self, RequestError>
    where
        R: SchemaResolver + ?Sized,
    {
        let merged =
            filter::merge_filters(&self.api_filters, query, &self.table, resolver, delimiter)?;
        Ok(self.with_filters(merged))
    }

    pub fn with_havings(&self, havings: Havings) -> Self {
        Self {
            havings: Arc::new(havings),
            ..self.clone()
        }
    }

    /// Replace the sorts. Exact duplicates are dropped, keeping the first.
    pub fn with_sorts(&self, sorts: impl IntoIterator<Item = OrderByColumn>) -> Self {
        let unique: IndexSet<OrderByColumn> = sorts.into_iter().collect();
        Self {
            sorts: Arc::new(unique.into_iter().collect()),
            ..self.clone()
        }
    }

    pub fn with_count(&self, count: Option<NonZeroU32>) -> Self {
        Self {
            count,
            ..self.clone()
        }
    }

    pub fn with_top_n(&self, top_n: Option<NonZeroU32>) -> Self {
        Self {
            top_n,
            ..self.clone()
        }
    }

    pub fn with_time_zone(&self, time_zone: TimeZone) -> Self {
        Self {
            time_zone,
            ..self.clone()
        }
    }

    pub fn with_pagination(&self, pagination: Option<PaginationParameters>) -> Self {
        Self {
            pagination,
            ..self.clone()
        }
    }

    pub fn with_format(&self, format: ResponseFormat) -> Self {
        Self {
            format,
            ..self.clone()
        }
    }

    pub fn with_async_after(&self, async_after: AsyncAfter) -> Self {
        Self {
            async_after,
            ..self.clone()
        }
    }

    /// Run cross-field validation, returning the request unchanged if it
    /// passes.
    pub fn validated(self) -> Result<Self, RequestError> {
        validation::validate(&self).map_err(RequestError::CrossFieldValidation)?;
        Ok(self)
    }
}

// ============================================================================
// Serialization helpers
// ============================================================================

fn table_name<S: Serializer>(table: &Arc<LogicalTable>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(table.name())
}

fn names<K: GroupKey, S: Serializer>(
    set: &Arc<IndexSet<K>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(set.iter().map(GroupKey::group_name))
}

fn shared<T: Serialize, S: Serializer>(value: &Arc<T>, serializer: S) -> Result<S::Ok, S::Error> {
    value.as_ref().serialize(serializer)
}
