#[path = "../common/mod.rs"]
mod common;

use bard::error::RequestError;
use bard::having::{merge_havings, parse_having_clause, parse_havings, HavingError, HavingOperation};
use common::{catalog, sales};
use insta::assert_snapshot;

#[test]
fn test_parse_having() {
    let catalog = catalog();
    let table = sales(&catalog);

    let having = parse_having_clause("revenue-gt[1000.5]", &table, &catalog).unwrap();

    assert_eq!(having.metric().name(), "revenue");
    assert_eq!(having.operation(), HavingOperation::Gt);
    assert_eq!(having.values(), &[1000.5]);
}

#[test]
fn test_aliases() {
    let catalog = catalog();
    let table = sales(&catalog);

    let a = parse_having_clause("clicks-notLessThan[10]", &table, &catalog).unwrap();
    let b = parse_having_clause("clicks-gte[10]", &table, &catalog).unwrap();

    assert_eq!(a, b);
}

#[test]
fn test_between_requires_two_values() {
    let catalog = catalog();
    let table = sales(&catalog);

    let err = parse_having_clause("revenue-notbetween[1]", &table, &catalog).unwrap_err();
    assert!(matches!(err, HavingError::MissingHavingValues { required: 2, actual: 1, .. }));

    let err = parse_having_clause("revenue-between[1,2,3]", &table, &catalog).unwrap_err();
    assert!(matches!(err, HavingError::HavingValueCount { allowed: 2, actual: 3, .. }));
}

#[test]
fn test_non_numeric_value() {
    let catalog = catalog();
    let table = sales(&catalog);

    let err = parse_having_clause("revenue-gt[lots]", &table, &catalog).unwrap_err();

    assert_snapshot!(err.to_string(), @"Having value 'lots' is not a finite number");
}

#[test]
fn test_unknown_metric_suggestion() {
    let catalog = catalog();
    let table = sales(&catalog);

    let err = parse_having_clause("revenu-gt[1]", &table, &catalog).unwrap_err();

    assert_snapshot!(err.to_string(), @"Unknown metric 'revenu' for table 'sales'. Did you mean 'revenue'?");
}

#[test]
fn test_unknown_operation() {
    let catalog = catalog();
    let table = sales(&catalog);

    let err = parse_having_clause("revenue-in[1]", &table, &catalog).unwrap_err();

    assert!(matches!(err, HavingError::UnknownHavingOperation { .. }));
}

#[test]
fn test_malformed() {
    let catalog = catalog();
    let table = sales(&catalog);

    let err = parse_having_clause("revenue-gt[1", &table, &catalog).unwrap_err();

    assert!(matches!(err, HavingError::MalformedHavingSyntax(_)));
}

#[test]
fn test_grouped_by_metric() {
    let catalog = catalog();
    let table = sales(&catalog);

    let havings = parse_havings("revenue-gt[10],clicks-lt[5],revenue-lt[100]", &table, &catalog, ',').unwrap();

    let keys: Vec<&str> = havings.keys().map(|m| m.name()).collect();
    assert_eq!(keys, vec!["revenue", "clicks"]);
    assert_eq!(havings.value_count(), 3);
}

#[test]
fn test_merge_unions_per_metric() {
    let catalog = catalog();
    let table = sales(&catalog);

    let existing = parse_havings("revenue-gt[10]", &table, &catalog, ',').unwrap();
    let merged = merge_havings(&existing, "revenue-gt[10],revenue-lt[20]", &table, &catalog, ',').unwrap();

    assert_eq!(merged.len(), 1);
    assert_eq!(merged.value_count(), 2);
}

#[test]
fn test_error_carries_clause_index() {
    let catalog = catalog();
    let table = sales(&catalog);

    let err = parse_havings("revenue-gt[10],clicks-gt[x]", &table, &catalog, ',').unwrap_err();

    assert!(matches!(err, RequestError::Having { index: 1, .. }));
    assert_snapshot!(err.to_string(), @"Having clause 2 'clicks-gt[x]': Having value 'x' is not a finite number");
}
