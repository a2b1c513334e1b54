//! Immutable request models and their raw-parameter parsers.
//!
//! A request is assembled in lifecycle order (table, granularity,
//! dimensions, metrics, intervals, filters, havings, sorts, and the remaining
//! response parameters) through `with_*` transforms. Each transform returns a
//! new request; unchanged parts are shared through `Arc`.

mod builder;
mod data;
mod dimensions;
mod format;
mod pagination;
mod sort;

pub use builder::{build_data_request, build_dimensions_request, RequestParameters};
pub use data::{DataApiRequest, DimensionFields};
pub use dimensions::DimensionsApiRequest;
pub use format::{AsyncAfter, ResponseFormat};
pub use pagination::{parse_positive, PaginationParameters};
pub use sort::{parse_sorts, OrderByColumn, SortColumn, SortDirection, DATE_TIME_STRING};

use crate::filter::ApiFilters;
use crate::model::TimeError;
use serde::Serialize;
use thiserror::Error;

/// Errors for a single non-expression request parameter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("expected a positive integer")]
    NotPositive,

    #[error("expected one of: json, jsonapi, csv, debug")]
    UnknownFormat,

    #[error("expected 'never', 'always' or a number of milliseconds")]
    InvalidAsyncAfter,

    #[error("unknown sort direction '{0}', expected 'asc' or 'desc'")]
    UnknownSortDirection(String),

    #[error("malformed sort column '{0}'")]
    MalformedSort(String),

    #[error("malformed dimension entry '{0}', expected <name> or <name>(<field>|<field>...)")]
    MalformedDimension(String),

    #[error("perPage and page must be given together")]
    IncompletePagination,

    #[error(transparent)]
    Time(#[from] TimeError),
}

/// Any request the API accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ApiRequest {
    Data(DataApiRequest),
    Dimensions(DimensionsApiRequest),
}

impl ApiRequest {
    pub fn format(&self) -> ResponseFormat {
        match self {
            ApiRequest::Data(request) => request.format(),
            ApiRequest::Dimensions(request) => request.format(),
        }
    }

    pub fn pagination(&self) -> Option<PaginationParameters> {
        match self {
            ApiRequest::Data(request) => request.pagination(),
            ApiRequest::Dimensions(request) => request.pagination(),
        }
    }

    pub fn async_after(&self) -> AsyncAfter {
        match self {
            ApiRequest::Data(request) => request.async_after(),
            ApiRequest::Dimensions(request) => request.async_after(),
        }
    }

    pub fn api_filters(&self) -> &ApiFilters {
        match self {
            ApiRequest::Data(request) => request.api_filters(),
            ApiRequest::Dimensions(request) => request.api_filters(),
        }
    }
}

impl From<DataApiRequest> for ApiRequest {
    fn from(request: DataApiRequest) -> Self {
        ApiRequest::Data(request)
    }
}

impl From<DimensionsApiRequest> for ApiRequest {
    fn from(request: DimensionsApiRequest) -> Self {
        ApiRequest::Dimensions(request)
    }
}
