//! Whole-query filter parsing and merging.

use super::{parse_filter_clause, ApiFilter, ApiFilters};
use crate::error::RequestError;
use crate::grammar::split_top_level;
use crate::model::LogicalTable;
use crate::schema::SchemaResolver;
use std::sync::Arc;

/// Parse a delimited filter query into filters grouped by dimension.
///
/// Dimensions keep the order in which they were first seen. A blank query
/// yields an empty collection. The first failing clause aborts the query.
pub fn parse_filters<R>(
    query: &str,
    table: &LogicalTable,
    resolver: &R,
    delimiter: char,
) -> Result<ApiFilters, RequestError>
where
    R: SchemaResolver + ?Sized,
{
    let mut filters = ApiFilters::new();
    for (index, clause) in split_top_level(query, delimiter).into_iter().enumerate() {
        let filter = parse_filter_clause(clause, table, resolver).map_err(|source| {
            RequestError::Filter {
                index,
                clause: clause.to_string(),
                source,
            }
        })?;
        insert(&mut filters, filter);
    }

    tracing::debug!(
        table = table.name(),
        dimensions = filters.len(),
        filters = filters.value_count(),
        "parsed filter query"
    );
    Ok(filters)
}

/// Parse `query` and union it into a copy of `existing`.
///
/// Filters already present are not duplicated; nothing in `existing` is lost.
pub fn merge_filters<R>(
    existing: &ApiFilters,
    query: &str,
    table: &LogicalTable,
    resolver: &R,
    delimiter: char,
) -> Result<ApiFilters, RequestError>
where
    R: SchemaResolver + ?Sized,
{
    let parsed = parse_filters(query, table, resolver, delimiter)?;
    Ok(existing.union(&parsed))
}

fn insert(filters: &mut ApiFilters, filter: ApiFilter) {
    let dimension = Arc::clone(filter.dimension());
    filters.insert(dimension, filter);
}
