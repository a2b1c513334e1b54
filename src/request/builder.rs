//! Builds requests from raw query parameters.
//!
//! Parameters are applied in lifecycle order so that each stage can resolve
//! names against what earlier stages produced: the table scopes dimension,
//! metric, filter and having lookups, and the time zone governs how interval
//! bounds are read.

use indexmap::IndexSet;
use regex::Regex;
use serde::Deserialize;
use std::sync::{Arc, LazyLock};

use super::{
    parse_positive, parse_sorts, AsyncAfter, DataApiRequest, DimensionFields,
    DimensionsApiRequest, PaginationParameters, ParameterError, ResponseFormat,
};
use crate::config::Settings;
use crate::error::RequestError;
use crate::filter::parse_filters;
use crate::grammar::split_top_level;
use crate::having::parse_havings;
use crate::model::{Dimension, Granularity, Interval, LogicalMetric, LogicalTable, TimeZone};
use crate::schema::{suggest_closest, SchemaResolver};

/// `name` or `name(field|field...)`.
static DIMENSION_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>[^()\s|]+)(?:\((?P<fields>[^()]*)\))?$").unwrap()
});

/// Raw request parameters, exactly as received.
///
/// Field names follow the query-string parameter names when deserialized.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestParameters {
    pub table: String,
    #[serde(alias = "grain")]
    pub granularity: Option<String>,
    pub dimensions: Option<String>,
    pub metrics: Option<String>,
    #[serde(alias = "dateTime")]
    pub intervals: Option<String>,
    pub filters: Option<String>,
    pub having: Option<String>,
    #[serde(alias = "sort")]
    pub sorts: Option<String>,
    pub count: Option<String>,
    pub top_n: Option<String>,
    pub per_page: Option<String>,
    pub page: Option<String>,
    pub format: Option<String>,
    pub time_zone: Option<String>,
    pub async_after: Option<String>,
}

/// Build a data request from raw parameters.
///
/// The request is not validated; call [`DataApiRequest::validated`] for the
/// cross-field checks.
pub fn build_data_request<R>(
    params: &RequestParameters,
    resolver: &R,
    settings: &Settings,
) -> Result<DataApiRequest, RequestError>
where
    R: SchemaResolver + ?Sized,
{
    let grammar = &settings.grammar;
    let table = resolve_table(&params.table, resolver)?;

    let granularity = match params.granularity.as_deref() {
        Some(raw) => Granularity::parse(raw).map_err(|e| parameter("granularity", raw, e))?,
        None => Granularity::All,
    };
    let time_zone = match params.time_zone.as_deref() {
        Some(raw) => TimeZone::parse(raw).map_err(|e| parameter("timeZone", raw, e))?,
        None => settings.defaults.time_zone,
    };

    let mut request = DataApiRequest::new(Arc::clone(&table), granularity).with_time_zone(time_zone);
    tracing::debug!(table = table.name(), %granularity, %time_zone, "building data request");

    if let Some(raw) = params.dimensions.as_deref() {
        let (dimensions, fields) = parse_dimensions(raw, &table, resolver)?;
        request = request.with_dimensions(dimensions).with_dimension_fields(fields);
    }

    if let Some(raw) = params.metrics.as_deref() {
        request = request.with_logical_metrics(parse_metrics(raw, &table, resolver)?);
    }

    if let Some(raw) = params.intervals.as_deref() {
        let intervals = split_top_level(raw, grammar.interval_delimiter)
            .into_iter()
            .map(|interval| Interval::parse(interval, time_zone))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| parameter("dateTime", raw, e))?;
        request = request.with_intervals(intervals);
    }

    if let Some(raw) = params.filters.as_deref() {
        let filters = parse_filters(raw, &table, resolver, grammar.filter_delimiter)?;
        request = request.with_filters(filters);
    }

    if let Some(raw) = params.having.as_deref() {
        let havings = parse_havings(raw, &table, resolver, grammar.having_delimiter)?;
        request = request.with_havings(havings);
    }

    if let Some(raw) = params.sorts.as_deref() {
        let sorts = parse_sorts(raw, grammar.sort_delimiter).map_err(|e| parameter("sort", raw, e))?;
        request = request.with_sorts(sorts);
    }

    if let Some(raw) = params.count.as_deref() {
        request = request.with_count(Some(parse_positive(raw).map_err(|e| parameter("count", raw, e))?));
    }
    if let Some(raw) = params.top_n.as_deref() {
        request = request.with_top_n(Some(parse_positive(raw).map_err(|e| parameter("topN", raw, e))?));
    }

    let request = request
        .with_pagination(parse_pagination(params, settings)?)
        .with_format(parse_format(params, settings)?)
        .with_async_after(parse_async_after(params, settings)?);

    tracing::debug!(
        dimensions = request.dimensions().len(),
        metrics = request.logical_metrics().len(),
        intervals = request.intervals().len(),
        filters = request.api_filters().value_count(),
        havings = request.havings().value_count(),
        sorts = request.sorts().len(),
        "built data request"
    );
    Ok(request)
}

/// Build a request for the values of `dimension`.
///
/// Only `filters`, `perPage`, `page`, `format` and `asyncAfter` are read from
/// `params`; filters may only reference `dimension` itself.
pub fn build_dimensions_request<R>(
    dimension: &str,
    params: &RequestParameters,
    resolver: &R,
    settings: &Settings,
) -> Result<DimensionsApiRequest, RequestError>
where
    R: SchemaResolver + ?Sized,
{
    let resolved = resolver.resolve_dimension_by_name(dimension).ok_or_else(|| {
        let known = resolver.known_dimensions();
        RequestError::UnknownDimension {
            name: dimension.to_string(),
            table: "dimensions".to_string(),
            suggestion: suggest_closest(dimension, known.iter().map(String::as_str)),
        }
    })?;

    let mut request = DimensionsApiRequest::new(resolved);
    if let Some(raw) = params.filters.as_deref() {
        request = request.merge_filters(raw, resolver, settings.grammar.filter_delimiter)?;
    }

    let request = request
        .with_pagination(parse_pagination(params, settings)?)
        .with_format(parse_format(params, settings)?)
        .with_async_after(parse_async_after(params, settings)?);

    tracing::debug!(
        dimension,
        filters = request.api_filters().value_count(),
        "built dimensions request"
    );
    Ok(request)
}

fn parameter(
    parameter: &'static str,
    value: &str,
    source: impl Into<ParameterError>,
) -> RequestError {
    RequestError::Parameter {
        parameter,
        value: value.to_string(),
        source: source.into(),
    }
}

fn resolve_table<R>(name: &str, resolver: &R) -> Result<Arc<LogicalTable>, RequestError>
where
    R: SchemaResolver + ?Sized,
{
    resolver.resolve_table(name).ok_or_else(|| {
        let known = resolver.known_tables();
        RequestError::UnknownTable {
            name: name.to_string(),
            suggestion: suggest_closest(name, known.iter().map(String::as_str)),
        }
    })
}

/// Parse `region(id|desc),product` into grouping dimensions and their
/// requested fields.
fn parse_dimensions<R>(
    raw: &str,
    table: &LogicalTable,
    resolver: &R,
) -> Result<(IndexSet<Arc<Dimension>>, DimensionFields), RequestError>
where
    R: SchemaResolver + ?Sized,
{
    let mut dimensions = IndexSet::new();
    let mut fields = DimensionFields::new();

    for entry in split_top_level(raw, ',') {
        let captures = DIMENSION_ENTRY
            .captures(entry)
            .ok_or_else(|| parameter("dimensions", raw, ParameterError::MalformedDimension(entry.to_string())))?;
        let name = captures.name("name").map(|m| m.as_str()).unwrap_or_default();

        let dimension = resolver.resolve_dimension(name, table).ok_or_else(|| {
            RequestError::UnknownDimension {
                name: name.to_string(),
                table: table.name().to_string(),
                suggestion: suggest_closest(name, table.dimension_names()),
            }
        })?;

        if let Some(list) = captures.name("fields") {
            let names: Vec<&str> = list.as_str().split('|').map(str::trim).collect();
            if names.iter().any(|field| field.is_empty()) {
                return Err(parameter(
                    "dimensions",
                    raw,
                    ParameterError::MalformedDimension(entry.to_string()),
                ));
            }
            for field_name in names {
                let field = resolver
                    .resolve_field(&dimension, Some(field_name))
                    .ok_or_else(|| RequestError::UnknownDimensionField {
                        dimension: dimension.name().to_string(),
                        field: field_name.to_string(),
                    })?;
                fields.insert(Arc::clone(&dimension), field);
            }
        }

        dimensions.insert(dimension);
    }

    Ok((dimensions, fields))
}

fn parse_metrics<R>(
    raw: &str,
    table: &LogicalTable,
    resolver: &R,
) -> Result<IndexSet<Arc<LogicalMetric>>, RequestError>
where
    R: SchemaResolver + ?Sized,
{
    split_top_level(raw, ',')
        .into_iter()
        .map(|name| {
            resolver
                .resolve_metric(name, table)
                .ok_or_else(|| RequestError::UnknownMetric {
                    name: name.to_string(),
                    table: table.name().to_string(),
                    suggestion: suggest_closest(name, table.metric_names()),
                })
        })
        .collect()
}

/// `perPage` alone starts at page one; `page` alone falls back to the
/// configured page size.
fn parse_pagination(
    params: &RequestParameters,
    settings: &Settings,
) -> Result<Option<PaginationParameters>, RequestError> {
    let per_page = params
        .per_page
        .as_deref()
        .map(|raw| parse_positive(raw).map_err(|e| parameter("perPage", raw, e)))
        .transpose()?;
    let page = params
        .page
        .as_deref()
        .map(|raw| parse_positive(raw).map_err(|e| parameter("page", raw, e)))
        .transpose()?;

    match (per_page.or(settings.defaults.per_page), page) {
        (Some(per_page), Some(page)) => Ok(Some(PaginationParameters::new(per_page, page))),
        (Some(per_page), None) if params.per_page.is_some() => {
            Ok(Some(PaginationParameters::new(per_page, std::num::NonZeroU32::MIN)))
        }
        (None, Some(_)) => Err(parameter(
            "page",
            params.page.as_deref().unwrap_or_default(),
            ParameterError::IncompletePagination,
        )),
        _ => Ok(None),
    }
}

fn parse_format(params: &RequestParameters, settings: &Settings) -> Result<ResponseFormat, RequestError> {
    match params.format.as_deref() {
        Some(raw) => raw.parse().map_err(|e| parameter("format", raw, e)),
        None => Ok(settings.defaults.format),
    }
}

fn parse_async_after(params: &RequestParameters, settings: &Settings) -> Result<AsyncAfter, RequestError> {
    match params.async_after.as_deref() {
        Some(raw) => raw.parse().map_err(|e| parameter("asyncAfter", raw, e)),
        None => Ok(settings.defaults.async_after),
    }
}
