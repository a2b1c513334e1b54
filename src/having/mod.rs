//! Having expressions: predicates over aggregated metric values.
//!
//! Grammar: `<metric>-<operation>[<number>{,<number>}]`, e.g.
//! `revenue-gt[1000],clicks-between[10,20]`. Clauses are grouped by metric.

mod api_having;
mod operation;
mod parser;

pub use api_having::{ApiHaving, Havings};
pub use operation::HavingOperation;
pub use parser::{merge_havings, parse_having_clause, parse_havings};

use crate::grammar::SyntaxError;
use crate::schema::did_you_mean;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HavingError {
    #[error("Unknown metric '{name}' for table '{table}'{}", did_you_mean(.suggestion))]
    UnknownMetric {
        name: String,
        table: String,
        suggestion: Option<String>,
    },

    #[error("Unknown having operation '{operation}'{}", did_you_mean(.suggestion))]
    UnknownHavingOperation {
        operation: String,
        suggestion: Option<String>,
    },

    #[error("Malformed having syntax: {0}")]
    MalformedHavingSyntax(#[from] SyntaxError),

    #[error("Having value '{value}' is not a finite number")]
    MalformedHavingValue { value: String },

    #[error("Having operation '{operation}' requires at least {required} value(s), got {actual}")]
    MissingHavingValues {
        operation: HavingOperation,
        required: usize,
        actual: usize,
    },

    #[error("Having operation '{operation}' accepts at most {allowed} value(s), got {actual}")]
    HavingValueCount {
        operation: HavingOperation,
        allowed: usize,
        actual: usize,
    },
}
