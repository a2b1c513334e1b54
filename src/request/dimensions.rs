use serde::{Serialize, Serializer};
use std::sync::Arc;

use super::{AsyncAfter, PaginationParameters, ResponseFormat};
use crate::error::RequestError;
use crate::filter::{self, ApiFilters};
use crate::model::{Dimension, LogicalTable};
use crate::schema::SchemaResolver;

/// A request for the values of a single dimension.
///
/// Filters may only reference the requested dimension; they are parsed
/// against [`DimensionsApiRequest::scope`], a pseudo-table exposing just that
/// dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionsApiRequest {
    #[serde(serialize_with = "dimension_name")]
    dimension: Arc<Dimension>,
    #[serde(serialize_with = "shared_filters")]
    api_filters: Arc<ApiFilters>,
    pagination: Option<PaginationParameters>,
    format: ResponseFormat,
    async_after: AsyncAfter,
}

impl DimensionsApiRequest {
    pub fn new(dimension: Arc<Dimension>) -> Self {
        Self {
            dimension,
            api_filters: Arc::default(),
            pagination: None,
            format: ResponseFormat::default(),
            async_after: AsyncAfter::default(),
        }
    }

    pub fn dimension(&self) -> &Arc<Dimension> {
        &self.dimension
    }

    /// The pseudo-table filters of this request are resolved against.
    pub fn scope(&self) -> LogicalTable {
        LogicalTable::dimension_scope(&self.dimension)
    }

    pub fn api_filters(&self) -> &ApiFilters {
        &self.api_filters
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

    /// Replace the filters. Filters on any other dimension are dropped.
    pub fn with_filters(&self, mut filters: ApiFilters) -> Self {
        filters.retain(|dimension, _| dimension == &self.dimension);
        Self {
            api_filters: Arc::new(filters),
            ..self.clone()
        }
    }

    /// Parse `query` in this request's scope and union it into the filters.
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
            filter::merge_filters(&self.api_filters, query, &self.scope(), resolver, delimiter)?;
        Ok(self.with_filters(merged))
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
}

fn dimension_name<S: Serializer>(dimension: &Arc<Dimension>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(dimension.name())
}

fn shared_filters<S: Serializer>(filters: &Arc<ApiFilters>, serializer: S) -> Result<S::Ok, S::Error> {
    filters.as_ref().serialize(serializer)
}
