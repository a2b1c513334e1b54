//! Single-clause filter parser.

use super::{ApiFilter, FilterError, FilterOperation};
use crate::grammar::{split_clause, SyntaxError};
use crate::model::LogicalTable;
use crate::schema::{suggest_closest, SchemaResolver};

/// Parse one clause such as `region.desc-contains[North]` against `table`.
///
/// The clause is split structurally first; names are then resolved in order:
/// dimension, field (the dimension's key field when omitted), operation.
/// The value count is checked last.
pub fn parse_filter_clause<R>(
    clause: &str,
    table: &LogicalTable,
    resolver: &R,
) -> Result<ApiFilter, FilterError>
where
    R: SchemaResolver + ?Sized,
{
    let parts = split_clause(clause)?;

    let (dimension_name, field_name) = match parts.subject.split_once('.') {
        Some((dimension, field)) => (dimension, Some(field)),
        None => (parts.subject, None),
    };
    if dimension_name.is_empty() {
        return Err(SyntaxError("missing dimension name".into()).into());
    }
    if field_name == Some("") {
        return Err(SyntaxError(format!("missing field name after '{}.'", dimension_name)).into());
    }

    let dimension = resolver
        .resolve_dimension(dimension_name, table)
        .ok_or_else(|| FilterError::UnknownDimension {
            name: dimension_name.to_string(),
            table: table.name().to_string(),
            suggestion: suggest_closest(dimension_name, table.dimension_names()),
        })?;

    let field = resolver
        .resolve_field(&dimension, field_name)
        .ok_or_else(|| FilterError::UnknownDimensionField {
            dimension: dimension.name().to_string(),
            field: field_name.unwrap_or_default().to_string(),
            known: dimension.field_names().map(str::to_string).collect(),
        })?;

    let operation = FilterOperation::from_name(parts.operation).ok_or_else(|| {
        FilterError::UnknownFilterOperation {
            operation: parts.operation.to_string(),
            suggestion: suggest_closest(parts.operation, FilterOperation::all_names()),
        }
    })?;

    let filter = ApiFilter::new(dimension, field, operation, parts.values.unwrap_or_default())?;
    tracing::debug!(clause, filter = %filter, "parsed filter clause");
    Ok(filter)
}
