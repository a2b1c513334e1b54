//! Filter expressions.
//!
//! A filter query is a delimited list of clauses of the form
//! `<dimension>[.<field>]-<operation>[<value>,...]`, for example
//! `region.id-in[US,CA],product-notnull`. Each clause parses to one
//! [`ApiFilter`]; the clauses of a query are grouped by dimension into
//! [`ApiFilters`].

mod aggregate;
mod api_filter;
mod operation;
mod parser;

pub use aggregate::{merge_filters, parse_filters};
pub use api_filter::{filters_to_query, ApiFilter, ApiFilters};
pub use operation::{Arity, FilterOperation};
pub use parser::parse_filter_clause;

use crate::grammar::SyntaxError;
use crate::schema::did_you_mean;
use thiserror::Error;

/// Errors for a single filter clause.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("Unknown dimension '{name}' for table '{table}'{}", did_you_mean(.suggestion))]
    UnknownDimension {
        name: String,
        table: String,
        suggestion: Option<String>,
    },

    #[error("Unknown field '{field}' for dimension '{dimension}'. Known fields: {}", .known.join(", "))]
    UnknownDimensionField {
        dimension: String,
        field: String,
        known: Vec<String>,
    },

    #[error("Unknown filter operation '{operation}'{}", did_you_mean(.suggestion))]
    UnknownFilterOperation {
        operation: String,
        suggestion: Option<String>,
    },

    #[error("Malformed filter syntax: {0}")]
    MalformedFilterSyntax(#[from] SyntaxError),

    #[error("Filter operation '{operation}' requires at least {required} value(s), got {actual}")]
    MissingFilterValues {
        operation: FilterOperation,
        required: usize,
        actual: usize,
    },

    #[error("Filter operation '{operation}' accepts at most {allowed} value(s), got {actual}")]
    FilterValueCount {
        operation: FilterOperation,
        allowed: usize,
        actual: usize,
    },

    #[error("Filter operation '{operation}' needs distinct bounds, got '{value}' twice")]
    IdenticalBounds {
        operation: FilterOperation,
        value: String,
    },
}
