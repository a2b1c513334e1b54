//! Top-level error for building a request.
//!
//! Clause-level errors from the filter and having parsers are wrapped with the
//! zero-based index and text of the failing clause; messages show the index
//! one-based.

use crate::filter::FilterError;
use crate::having::HavingError;
use crate::request::ParameterError;
use crate::schema::did_you_mean;
use crate::validation::ValidationError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    #[error("Unknown table '{name}'{}", did_you_mean(.suggestion))]
    UnknownTable {
        name: String,
        suggestion: Option<String>,
    },

    #[error("Unknown dimension '{name}' for table '{table}'{}", did_you_mean(.suggestion))]
    UnknownDimension {
        name: String,
        table: String,
        suggestion: Option<String>,
    },

    #[error("Unknown field '{field}' for dimension '{dimension}'")]
    UnknownDimensionField { dimension: String, field: String },

    #[error("Unknown metric '{name}' for table '{table}'{}", did_you_mean(.suggestion))]
    UnknownMetric {
        name: String,
        table: String,
        suggestion: Option<String>,
    },

    #[error("Filter clause {} '{clause}': {source}", .index + 1)]
    Filter {
        index: usize,
        clause: String,
        source: FilterError,
    },

    #[error("Having clause {} '{clause}': {source}", .index + 1)]
    Having {
        index: usize,
        clause: String,
        source: HavingError,
    },

    #[error("Invalid {parameter} '{value}': {source}")]
    Parameter {
        parameter: &'static str,
        value: String,
        source: ParameterError,
    },

    #[error("Request failed validation:\n{}", format_violations(.0))]
    CrossFieldValidation(Vec<ValidationError>),
}

fn format_violations(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

impl RequestError {
    /// Violations carried by a failed validation, empty otherwise.
    pub fn violations(&self) -> &[ValidationError] {
        match self {
            RequestError::CrossFieldValidation(errors) => errors,
            _ => &[],
        }
    }
}
