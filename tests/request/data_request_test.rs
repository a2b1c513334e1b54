#[path = "../common/mod.rs"]
mod common;

use bard::model::{Granularity, Interval, TimeGrain, TimeZone};
use bard::request::{
    ApiRequest, AsyncAfter, DataApiRequest, OrderByColumn, PaginationParameters, ResponseFormat,
    SortColumn,
};
use common::{build, catalog, sales, valid_params};
use std::num::NonZeroU32;
use std::sync::Arc;

fn january() -> Interval {
    Interval::parse("2024-01-01/2024-02-01", TimeZone::utc()).unwrap()
}

#[test]
fn test_new_request_defaults() {
    let catalog = catalog();
    let request = DataApiRequest::new(sales(&catalog), Granularity::All);

    assert_eq!(request.table().name(), "sales");
    assert!(request.dimensions().is_empty());
    assert!(request.intervals().is_empty());
    assert!(request.api_filters().is_empty());
    assert!(request.sorts().is_empty());
    assert_eq!(request.count(), None);
    assert_eq!(request.top_n(), None);
    assert_eq!(request.time_zone(), TimeZone::utc());
    assert_eq!(request.format(), ResponseFormat::Json);
    assert_eq!(request.async_after(), AsyncAfter::Never);
    assert_eq!(request.pagination(), None);
}

#[test]
fn test_with_intervals_replaces() {
    let catalog = catalog();
    let february = Interval::parse("2024-02-01/2024-03-01", TimeZone::utc()).unwrap();
    let request = DataApiRequest::new(sales(&catalog), Granularity::grain(TimeGrain::Day))
        .with_intervals([january()])
        .with_intervals([february]);

    assert_eq!(request.intervals().len(), 1);
    assert!(request.intervals().contains(&february));
}

#[test]
fn test_failed_merge_leaves_request_unchanged() {
    let catalog = catalog();
    let request = build(&catalog, &valid_params());
    let before = request.clone();

    assert!(request.merge_filters("age.id-eq[5]", &catalog, ',').is_err());
    assert_eq!(request, before);
}

#[test]
fn test_merge_filters_returns_new_request() {
    let catalog = catalog();
    let request = build(&catalog, &valid_params());

    let merged = request.merge_filters("region.id-eq[US]", &catalog, ',').unwrap();
    let merged = merged.merge_filters("region.id-eq[CA]", &catalog, ',').unwrap();

    assert!(request.api_filters().is_empty());
    assert_eq!(merged.api_filters().len(), 1);
    assert_eq!(merged.api_filters().value_count(), 2);
    let names: Vec<&str> = merged.filter_dimensions().map(|d| d.name()).collect();
    assert_eq!(names, vec!["region"]);
}

#[test]
fn test_response_parameters() {
    let catalog = catalog();
    let pagination = PaginationParameters::new(NonZeroU32::new(20).unwrap(), NonZeroU32::new(3).unwrap());
    let request = DataApiRequest::new(sales(&catalog), Granularity::All)
        .with_count(NonZeroU32::new(100))
        .with_top_n(NonZeroU32::new(5))
        .with_pagination(Some(pagination))
        .with_format(ResponseFormat::Csv)
        .with_async_after(AsyncAfter::After(500));

    assert_eq!(request.count().map(NonZeroU32::get), Some(100));
    assert_eq!(request.top_n().map(NonZeroU32::get), Some(5));
    assert_eq!(request.pagination(), Some(pagination));
    assert_eq!(request.format(), ResponseFormat::Csv);
    assert_eq!(request.async_after(), AsyncAfter::After(500));
}

#[test]
fn test_table_swap_shares_other_fields() {
    let catalog = catalog();
    let request = build(&catalog, &valid_params());
    let audience = Arc::clone(catalog.table("audience").unwrap());

    let swapped = request.with_table(audience);

    assert_eq!(swapped.table().name(), "audience");
    assert_eq!(swapped.dimensions(), request.dimensions());
    assert_eq!(swapped.logical_metrics(), request.logical_metrics());
}

#[test]
fn test_serializes_names() {
    let catalog = catalog();
    let request = build(&catalog, &valid_params())
        .with_sorts([OrderByColumn::desc(SortColumn::Metric("revenue".into()))]);

    let json = serde_json::to_value(ApiRequest::from(request)).unwrap();

    assert_eq!(json["type"], "data");
    assert_eq!(json["table"], "sales");
    assert_eq!(json["granularity"], "day");
    assert_eq!(json["dimensions"], serde_json::json!(["region", "product"]));
    assert_eq!(json["logicalMetrics"], serde_json::json!(["revenue", "clicks"]));
    assert_eq!(json["intervals"], serde_json::json!(["2024-01-01T00:00:00Z/2024-02-01T00:00:00Z"]));
    assert_eq!(json["sorts"][0]["column"], "revenue");
    assert_eq!(json["sorts"][0]["direction"], "desc");
    assert_eq!(json["timeZone"], "UTC");
    assert_eq!(json["asyncAfter"], "never");
}

#[test]
fn test_api_request_shared_accessors() {
    let catalog = catalog();
    let data: ApiRequest = build(&catalog, &valid_params()).with_format(ResponseFormat::JsonApi).into();

    assert_eq!(data.format(), ResponseFormat::JsonApi);
    assert!(data.api_filters().is_empty());
    assert_eq!(data.pagination(), None);
}
