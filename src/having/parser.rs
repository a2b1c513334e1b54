use super::{ApiHaving, HavingError, HavingOperation, Havings};
use crate::error::RequestError;
use crate::grammar::{split_clause, split_top_level};
use crate::model::LogicalTable;
use crate::schema::{suggest_closest, SchemaResolver};
use std::sync::Arc;

/// Parse one clause such as `revenue-gt[1000]`.
///
/// The metric must be valid for `table`; whether it was also requested is
/// checked later by the validator.
pub fn parse_having_clause<R>(
    clause: &str,
    table: &LogicalTable,
    resolver: &R,
) -> Result<ApiHaving, HavingError>
where
    R: SchemaResolver + ?Sized,
{
    let parts = split_clause(clause)?;

    let metric = resolver
        .resolve_metric(parts.subject, table)
        .ok_or_else(|| HavingError::UnknownMetric {
            name: parts.subject.to_string(),
            table: table.name().to_string(),
            suggestion: suggest_closest(parts.subject, table.metric_names()),
        })?;

    let operation = HavingOperation::from_name(parts.operation).ok_or_else(|| {
        HavingError::UnknownHavingOperation {
            operation: parts.operation.to_string(),
            suggestion: suggest_closest(parts.operation, HavingOperation::all_names()),
        }
    })?;

    let values = parts
        .values
        .unwrap_or_default()
        .iter()
        .map(|raw| parse_number(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let having = ApiHaving::new(metric, operation, values)?;
    tracing::debug!(clause, having = %having, "parsed having clause");
    Ok(having)
}

fn parse_number(raw: &str) -> Result<f64, HavingError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| HavingError::MalformedHavingValue {
            value: raw.to_string(),
        })
}

/// Parse a delimited having query into havings grouped by metric.
pub fn parse_havings<R>(
    query: &str,
    table: &LogicalTable,
    resolver: &R,
    delimiter: char,
) -> Result<Havings, RequestError>
where
    R: SchemaResolver + ?Sized,
{
    let mut havings = Havings::new();
    for (index, clause) in split_top_level(query, delimiter).into_iter().enumerate() {
        let having = parse_having_clause(clause, table, resolver).map_err(|source| {
            RequestError::Having {
                index,
                clause: clause.to_string(),
                source,
            }
        })?;
        havings.insert(Arc::clone(having.metric()), having);
    }

    tracing::debug!(
        table = table.name(),
        metrics = havings.len(),
        havings = havings.value_count(),
        "parsed having query"
    );
    Ok(havings)
}

/// Parse `query` and union it into a copy of `existing`.
pub fn merge_havings<R>(
    existing: &Havings,
    query: &str,
    table: &LogicalTable,
    resolver: &R,
    delimiter: char,
) -> Result<Havings, RequestError>
where
    R: SchemaResolver + ?Sized,
{
    let parsed = parse_havings(query, table, resolver, delimiter)?;
    Ok(existing.union(&parsed))
}
