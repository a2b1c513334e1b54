#[path = "../common/mod.rs"]
mod common;

use bard::filter::{parse_filter_clause, FilterError, FilterOperation};
use bard::grammar::encode_value;
use common::{catalog, sales};
use insta::assert_snapshot;
use proptest::prelude::*;

#[test]
fn test_parse_in_filter() {
    let catalog = catalog();
    let table = sales(&catalog);

    let filter = parse_filter_clause("region.id-in[US,CA]", &table, &catalog).unwrap();

    assert_eq!(filter.dimension().name(), "region");
    assert_eq!(filter.field().name, "id");
    assert_eq!(filter.operation(), FilterOperation::In);
    let values: Vec<&str> = filter.values().iter().map(String::as_str).collect();
    assert_eq!(values, vec!["US", "CA"]);
}

#[test]
fn test_field_defaults_to_key_field() {
    let catalog = catalog();
    let table = sales(&catalog);

    let filter = parse_filter_clause("product-startswith[AB]", &table, &catalog).unwrap();

    assert_eq!(filter.field().name, "sku");
}

#[test]
fn test_operation_aliases_and_case() {
    let catalog = catalog();
    let table = sales(&catalog);

    let a = parse_filter_clause("region.id-Equals[US]", &table, &catalog).unwrap();
    let b = parse_filter_clause("region.id-eq[US]", &table, &catalog).unwrap();

    assert_eq!(a, b);
}

#[test]
fn test_nullary_operations_accept_missing_or_empty_brackets() {
    let catalog = catalog();
    let table = sales(&catalog);

    let bare = parse_filter_clause("region.desc-notnull", &table, &catalog).unwrap();
    let empty = parse_filter_clause("region.desc-notnull[]", &table, &catalog).unwrap();

    assert_eq!(bare, empty);
    assert!(bare.values().is_empty());
}

#[test]
fn test_value_order_is_irrelevant() {
    let catalog = catalog();
    let table = sales(&catalog);

    let a = parse_filter_clause("region.id-eq[1,2]", &table, &catalog).unwrap();
    let b = parse_filter_clause("region.id-eq[2,1]", &table, &catalog).unwrap();

    assert_eq!(a, b);
}

#[test]
fn test_between_bounds_keep_order() {
    let catalog = catalog();
    let table = sales(&catalog);

    let filter = parse_filter_clause("product.name-between[a,m]", &table, &catalog).unwrap();
    let values: Vec<&str> = filter.values().iter().map(String::as_str).collect();

    assert_eq!(values, vec!["a", "m"]);
}

#[test]
fn test_unknown_dimension_for_table() {
    let catalog = catalog();
    let table = sales(&catalog);

    let err = parse_filter_clause("age.id-eq[5]", &table, &catalog).unwrap_err();

    assert!(matches!(err, FilterError::UnknownDimension { ref name, .. } if name == "age"));
}

#[test]
fn test_unknown_dimension_suggestion() {
    let catalog = catalog();
    let table = sales(&catalog);

    let err = parse_filter_clause("regoin.id-eq[US]", &table, &catalog).unwrap_err();

    assert_snapshot!(err.to_string(), @"Unknown dimension 'regoin' for table 'sales'. Did you mean 'region'?");
}

#[test]
fn test_empty_brackets_for_valued_operation() {
    let catalog = catalog();
    let table = sales(&catalog);

    let err = parse_filter_clause("status.desc-in[]", &table, &catalog).unwrap_err();

    assert!(matches!(
        err,
        FilterError::MissingFilterValues {
            operation: FilterOperation::In,
            required: 1,
            actual: 0
        }
    ));
    assert_snapshot!(err.to_string(), @"Filter operation 'in' requires at least 1 value(s), got 0");
}

#[test]
fn test_too_many_values() {
    let catalog = catalog();
    let table = sales(&catalog);

    let err = parse_filter_clause("region.id-gt[1,2]", &table, &catalog).unwrap_err();

    assert_snapshot!(err.to_string(), @"Filter operation 'gt' accepts at most 1 value(s), got 2");
}

#[test]
fn test_unknown_operation() {
    let catalog = catalog();
    let table = sales(&catalog);

    let err = parse_filter_clause("region.id-like[US]", &table, &catalog).unwrap_err();

    assert!(matches!(err, FilterError::UnknownFilterOperation { ref operation, .. } if operation == "like"));
}

#[test]
fn test_malformed_syntax() {
    let catalog = catalog();
    let table = sales(&catalog);

    for clause in [
        "region.id-in[US",
        "region.id-in[US,]",
        "region.id[US]",
        "region.id-in[US]]",
        "region.id-eq[%ZZ]",
        "region.id-eq[50%]",
    ] {
        let err = parse_filter_clause(clause, &table, &catalog).unwrap_err();
        assert!(
            matches!(err, FilterError::MalformedFilterSyntax(_)),
            "{}: {:?}",
            clause,
            err
        );
    }
}

#[test]
fn test_structure_checked_before_names() {
    let catalog = catalog();
    let table = sales(&catalog);

    // Unknown dimension, but the clause is structurally broken first.
    let err = parse_filter_clause("nowhere.id-in[US", &table, &catalog).unwrap_err();

    assert!(matches!(err, FilterError::MalformedFilterSyntax(_)));
}

#[test]
fn test_percent_encoded_values() {
    let catalog = catalog();
    let table = sales(&catalog);

    let filter = parse_filter_clause("product.name-eq[Nuts%2C%20Bolts]", &table, &catalog).unwrap();

    assert!(filter.values().contains("Nuts, Bolts"));
    assert_snapshot!(filter.to_string(), @"product.name-eq[Nuts%2C%20Bolts]");
}

#[test]
fn test_values_are_trimmed() {
    let catalog = catalog();
    let table = sales(&catalog);

    let filter = parse_filter_clause("region.id-in[US, CA]", &table, &catalog).unwrap();

    let values: Vec<&str> = filter.values().iter().map(String::as_str).collect();
    assert_eq!(values, vec!["US", "CA"]);
}

#[test]
fn test_between_with_identical_bounds() {
    let catalog = catalog();
    let table = sales(&catalog);

    let err = parse_filter_clause("region.id-between[5,5]", &table, &catalog).unwrap_err();

    assert!(matches!(err, FilterError::IdenticalBounds { ref value, .. } if value == "5"));
    assert_snapshot!(err.to_string(), @"Filter operation 'between' needs distinct bounds, got '5' twice");
}

fn operation_and_values() -> impl Strategy<Value = (FilterOperation, Vec<String>)> {
    let value = "[ -~]{1,12}";
    prop_oneof![
        (
            prop::sample::select(vec![
                FilterOperation::In,
                FilterOperation::NotIn,
                FilterOperation::Eq,
                FilterOperation::Neq,
                FilterOperation::StartsWith,
                FilterOperation::Contains,
            ]),
            prop::collection::vec(value, 1..5),
        ),
        (
            prop::sample::select(vec![
                FilterOperation::Gt,
                FilterOperation::Gte,
                FilterOperation::Lt,
                FilterOperation::Lte,
            ]),
            prop::collection::vec(value, 1..=1),
        ),
        (Just(FilterOperation::Between), prop::collection::vec(value, 2..=2)),
        (
            prop::sample::select(vec![FilterOperation::IsNull, FilterOperation::NotNull]),
            Just(Vec::new()),
        ),
    ]
}

proptest! {
    #[test]
    fn prop_display_round_trips(
        dimension in prop::sample::select(vec!["region.id", "region.desc", "product.name", "status"]),
        (operation, values) in operation_and_values(),
    ) {
        // Between rejects identical bounds.
        prop_assume!(operation != FilterOperation::Between || values[0] != values[1]);

        let catalog = catalog();
        let table = sales(&catalog);
        let encoded: Vec<String> = values.iter().map(|v| encode_value(v)).collect();
        let clause = format!("{}-{}[{}]", dimension, operation, encoded.join(","));

        let parsed = parse_filter_clause(&clause, &table, &catalog).unwrap();
        let reparsed = parse_filter_clause(&parsed.to_string(), &table, &catalog).unwrap();

        prop_assert_eq!(parsed, reparsed);
    }

    #[test]
    fn prop_value_permutation_is_equal(
        values in prop::collection::vec("[a-z0-9]{1,6}", 1..6),
        seed in any::<u64>(),
    ) {
        let catalog = catalog();
        let table = sales(&catalog);

        let mut shuffled = values.clone();
        let len = shuffled.len();
        shuffled.rotate_left((seed as usize) % len);

        let a = parse_filter_clause(&format!("region.id-in[{}]", values.join(",")), &table, &catalog).unwrap();
        let b = parse_filter_clause(&format!("region.id-in[{}]", shuffled.join(",")), &table, &catalog).unwrap();

        prop_assert_eq!(a, b);
    }
}
