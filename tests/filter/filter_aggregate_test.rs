#[path = "../common/mod.rs"]
mod common;

use bard::error::RequestError;
use bard::filter::{filters_to_query, merge_filters, parse_filters, FilterError};
use common::{catalog, sales};
use insta::assert_snapshot;

#[test]
fn test_groups_by_dimension_in_first_seen_order() {
    let catalog = catalog();
    let table = sales(&catalog);

    let filters = parse_filters(
        "product.name-contains[bolt],region.id-eq[US],product-notnull",
        &table,
        &catalog,
        ',',
    )
    .unwrap();

    let keys: Vec<&str> = filters.keys().map(|d| d.name()).collect();
    assert_eq!(keys, vec!["product", "region"]);
    assert_eq!(filters.value_count(), 3);
}

#[test]
fn test_blank_query_is_empty() {
    let catalog = catalog();
    let table = sales(&catalog);

    assert!(parse_filters("", &table, &catalog, ',').unwrap().is_empty());
    assert!(parse_filters("   ", &table, &catalog, ',').unwrap().is_empty());
}

#[test]
fn test_merging_same_dimension_yields_one_entry() {
    let catalog = catalog();
    let table = sales(&catalog);

    let existing = parse_filters("region.id-eq[US]", &table, &catalog, ',').unwrap();
    let merged = merge_filters(&existing, "region.id-eq[CA]", &table, &catalog, ',').unwrap();

    assert_eq!(merged.len(), 1);
    let region = merged.keys().next().unwrap();
    assert_eq!(region.name(), "region");
    assert_eq!(merged.get(region).unwrap().len(), 2);
}

#[test]
fn test_merge_does_not_duplicate() {
    let catalog = catalog();
    let table = sales(&catalog);

    let existing = parse_filters("region.id-in[US,CA]", &table, &catalog, ',').unwrap();
    let merged = merge_filters(&existing, "region.id-in[CA,US]", &table, &catalog, ',').unwrap();

    assert_eq!(merged, existing);
}

#[test]
fn test_failure_reports_clause_position() {
    let catalog = catalog();
    let table = sales(&catalog);

    let err = parse_filters("region.id-eq[US],age.id-eq[5]", &table, &catalog, ',').unwrap_err();

    match &err {
        RequestError::Filter {
            index,
            clause,
            source,
        } => {
            assert_eq!(*index, 1);
            assert_eq!(clause, "age.id-eq[5]");
            assert!(matches!(source, FilterError::UnknownDimension { .. }));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_snapshot!(err.to_string(), @"Filter clause 2 'age.id-eq[5]': Unknown dimension 'age' for table 'sales'");
}

#[test]
fn test_trailing_delimiter_is_an_empty_clause() {
    let catalog = catalog();
    let table = sales(&catalog);

    let err = parse_filters("region.id-eq[US],", &table, &catalog, ',').unwrap_err();

    assert!(matches!(
        err,
        RequestError::Filter {
            index: 1,
            source: FilterError::MalformedFilterSyntax(_),
            ..
        }
    ));
}

#[test]
fn test_custom_delimiter() {
    let catalog = catalog();
    let table = sales(&catalog);

    let filters = parse_filters("region.id-in[US,CA];status-isnull", &table, &catalog, ';').unwrap();

    assert_eq!(filters.len(), 2);
    assert_eq!(
        filters_to_query(&filters, ';'),
        "region.id-in[US,CA];status.id-isnull"
    );
}

#[test]
fn test_query_round_trip() {
    let catalog = catalog();
    let table = sales(&catalog);

    let filters = parse_filters(
        "region.desc-contains[North%2C South],product-in[a,b],region.id-neq[US]",
        &table,
        &catalog,
        ',',
    )
    .unwrap();
    let rendered = filters_to_query(&filters, ',');
    let reparsed = parse_filters(&rendered, &table, &catalog, ',').unwrap();

    assert_eq!(filters, reparsed);
}
