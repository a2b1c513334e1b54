//! # Bard
//!
//! Parses, validates and models analytical data API requests.
//!
//! ## Architecture
//!
//! Raw query parameters are parsed against schema metadata and assembled into
//! an immutable request:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                 Raw request parameters                   │
//! │  (table, grain, dimensions, metrics, dateTime, filters,  │
//! │   having, sort, count, topN, perPage, page, format ...)  │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [filter / having / sort parsers]
//! ┌─────────────────────────────────────────────────────────┐
//! │     ApiFilter, ApiHaving, OrderByColumn, Interval ...    │
//! │       (names resolved through a SchemaResolver)          │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [aggregation + with_* transforms]
//! ┌─────────────────────────────────────────────────────────┐
//! │                    DataApiRequest                        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [validation]
//! ┌─────────────────────────────────────────────────────────┐
//! │     Validated request, handed to a query builder         │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod grammar;
pub mod having;
pub mod model;
pub mod request;
pub mod schema;
pub mod validation;

pub use error::RequestError;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::config::Settings;
    pub use crate::error::RequestError;
    pub use crate::filter::{
        merge_filters, parse_filter_clause, parse_filters, ApiFilter, ApiFilters, FilterError,
        FilterOperation,
    };
    pub use crate::having::{parse_havings, ApiHaving, HavingError, HavingOperation, Havings};
    pub use crate::model::{
        Dimension, DimensionField, Granularity, Interval, LogicalMetric, LogicalTable, TimeGrain,
        TimeZone,
    };
    pub use crate::request::{
        build_data_request, build_dimensions_request, ApiRequest, AsyncAfter, DataApiRequest,
        DimensionsApiRequest, OrderByColumn, PaginationParameters, RequestParameters,
        ResponseFormat, SortColumn, SortDirection,
    };
    pub use crate::schema::{SchemaCatalog, SchemaResolver};
    pub use crate::validation::{validate, ValidationError};
}
