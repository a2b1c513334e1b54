//! Cross-field validation of data requests.
//!
//! Each parser checks its own parameter. The rules here relate parameters to
//! each other and to the table, and every violation is reported rather than
//! just the first.

use std::collections::HashSet;

use crate::model::{Granularity, LogicalTable};
use crate::request::{DataApiRequest, SortColumn};

/// Validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The request has no intervals.
    NoIntervals,
    /// Interval bounds do not fall on bucket boundaries.
    MisalignedInterval {
        interval: String,
        granularity: String,
    },
    /// The table cannot be queried at this granularity.
    UnsupportedGranularity { table: String, granularity: String },
    /// A dimension, metric or filter dimension the table does not expose.
    NotInTable {
        entity_type: &'static str,
        name: String,
        table: String,
    },
    /// A having on a metric that is not selected.
    HavingMetricNotRequested { metric: String },
    /// A field projection for a dimension that is not grouped by.
    FieldsForUnrequestedDimension { dimension: String },
    /// A sort on something the request does not select.
    SortColumnNotRequested { column: String },
    /// `dateTime` sorted anywhere but first.
    DateTimeSortNotFirst { position: usize },
    /// The same column sorted more than once.
    DuplicateSortColumn { column: String },
    /// `topN` without any sort to rank by.
    TopNWithoutSort,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::NoIntervals => write!(f, "At least one interval is required"),
            ValidationError::MisalignedInterval {
                interval,
                granularity,
            } => {
                write!(
                    f,
                    "Interval '{}' is not aligned to granularity '{}'",
                    interval, granularity
                )
            }
            ValidationError::UnsupportedGranularity { table, granularity } => {
                write!(
                    f,
                    "Table '{}' does not support granularity '{}'",
                    table, granularity
                )
            }
            ValidationError::NotInTable {
                entity_type,
                name,
                table,
            } => {
                write!(f, "{} '{}' is not valid for table '{}'", entity_type, name, table)
            }
            ValidationError::HavingMetricNotRequested { metric } => {
                write!(f, "Having references metric '{}' which is not requested", metric)
            }
            ValidationError::FieldsForUnrequestedDimension { dimension } => {
                write!(
                    f,
                    "Fields requested for dimension '{}' which is not requested",
                    dimension
                )
            }
            ValidationError::SortColumnNotRequested { column } => {
                write!(
                    f,
                    "Sort column '{}' is not a requested metric, a field of a requested dimension, or dateTime",
                    column
                )
            }
            ValidationError::DateTimeSortNotFirst { position } => {
                write!(
                    f,
                    "dateTime must be the first sort column, found at position {}",
                    position + 1
                )
            }
            ValidationError::DuplicateSortColumn { column } => {
                write!(f, "Sort column '{}' appears more than once", column)
            }
            ValidationError::TopNWithoutSort => write!(f, "topN requires at least one sort"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a data request.
pub fn validate(request: &DataApiRequest) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_time(request, &mut errors);
    validate_table_membership(request, &mut errors);
    validate_havings(request, &mut errors);
    validate_dimension_fields(request, &mut errors);
    validate_sorts(request, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        tracing::warn!(
            table = request.table().name(),
            violations = errors.len(),
            "request failed validation"
        );
        Err(errors)
    }
}

fn validate_time(request: &DataApiRequest, errors: &mut Vec<ValidationError>) {
    let table = request.table();
    let granularity = request.granularity();

    if !table.supports_granularity(&granularity) {
        errors.push(ValidationError::UnsupportedGranularity {
            table: table.name().to_string(),
            granularity: granularity.to_string(),
        });
    }

    if request.intervals().is_empty() {
        errors.push(ValidationError::NoIntervals);
        return;
    }

    let Granularity::Time { grain, .. } = granularity else {
        return;
    };
    let zone = request.bucket_zone();
    for interval in request.intervals() {
        if !grain.is_aligned(interval.start(), zone) || !grain.is_aligned(interval.end(), zone) {
            errors.push(ValidationError::MisalignedInterval {
                interval: interval.to_string(),
                granularity: granularity.to_string(),
            });
        }
    }
}

fn validate_table_membership(request: &DataApiRequest, errors: &mut Vec<ValidationError>) {
    let table: &LogicalTable = request.table();

    for dimension in request.dimensions() {
        if !table.supports_dimension(dimension.name()) {
            errors.push(not_in_table("Dimension", dimension.name(), table));
        }
    }

    for metric in request.logical_metrics() {
        if !table.supports_metric(metric.name()) {
            errors.push(not_in_table("Metric", metric.name(), table));
        }
    }

    for dimension in request.api_filters().keys() {
        if !table.supports_dimension(dimension.name()) {
            errors.push(not_in_table("Filter dimension", dimension.name(), table));
        }
    }
}

fn not_in_table(entity_type: &'static str, name: &str, table: &LogicalTable) -> ValidationError {
    ValidationError::NotInTable {
        entity_type,
        name: name.to_string(),
        table: table.name().to_string(),
    }
}

fn validate_havings(request: &DataApiRequest, errors: &mut Vec<ValidationError>) {
    for metric in request.havings().keys() {
        if !request.logical_metrics().contains(metric) {
            errors.push(ValidationError::HavingMetricNotRequested {
                metric: metric.name().to_string(),
            });
        }
    }
}

fn validate_dimension_fields(request: &DataApiRequest, errors: &mut Vec<ValidationError>) {
    for dimension in request.dimension_fields().keys() {
        if !request.dimensions().contains(dimension) {
            errors.push(ValidationError::FieldsForUnrequestedDimension {
                dimension: dimension.name().to_string(),
            });
        }
    }
}

fn validate_sorts(request: &DataApiRequest, errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();

    for (position, sort) in request.sorts().iter().enumerate() {
        let column = &sort.column;
        if !seen.insert(column) {
            errors.push(ValidationError::DuplicateSortColumn {
                column: column.to_string(),
            });
            continue;
        }

        let requested = match column {
            SortColumn::DateTime => {
                if position > 0 {
                    errors.push(ValidationError::DateTimeSortNotFirst { position });
                }
                true
            }
            SortColumn::Metric(name) => request.logical_metrics().iter().any(|m| m.name() == name),
            SortColumn::DimensionField { dimension, field } => request
                .dimensions()
                .iter()
                .any(|d| d.name() == dimension && d.has_field(field)),
        };
        if !requested {
            errors.push(ValidationError::SortColumnNotRequested {
                column: column.to_string(),
            });
        }
    }

    if request.top_n().is_some() && request.sorts().is_empty() {
        errors.push(ValidationError::TopNWithoutSort);
    }
}
