#[path = "../common/mod.rs"]
mod common;

use bard::model::{Granularity, TimeGrain, RATIO_METRIC_CATEGORY};
use bard::schema::{SchemaCatalog, SchemaError, SchemaResolver};
use common::{catalog, SCHEMA};
use std::io::Write;

#[test]
fn test_catalog_contents() {
    let catalog = catalog();

    assert_eq!(catalog.table_names(), vec!["audience", "sales"]);

    let product = catalog.dimension("product").unwrap();
    assert_eq!(product.key_field_name(), "sku");
    let fields: Vec<&str> = product.field_names().collect();
    assert_eq!(fields, vec!["sku", "name", "category"]);

    let ctr = catalog.metric("ctr").unwrap();
    assert_eq!(ctr.category(), Some(RATIO_METRIC_CATEGORY));
    assert!(ctr.is_ratio());
}

#[test]
fn test_table_granularities() {
    let catalog = catalog();
    let audience = catalog.resolve_table("audience").unwrap();

    assert!(audience.supports_granularity(&Granularity::grain(TimeGrain::Day)));
    assert!(!audience.supports_granularity(&Granularity::All));
}

#[test]
fn test_resolution_scoped_to_table() {
    let catalog = catalog();
    let sales = catalog.resolve_table("sales").unwrap();
    let audience = catalog.resolve_table("audience").unwrap();

    assert!(catalog.resolve_dimension("age", &sales).is_none());
    assert!(catalog.resolve_dimension("age", &audience).is_some());
    assert!(catalog.resolve_metric("revenue", &audience).is_none());
    assert!(catalog.resolve_dimension_by_name("age").is_some());
}

#[test]
fn test_suggestion_sources() {
    let catalog = catalog();

    assert_eq!(catalog.known_tables(), vec!["audience", "sales"]);
    assert_eq!(catalog.known_dimensions(), vec!["age", "product", "region", "status"]);
}

#[test]
fn test_from_file() {
    let path = std::env::temp_dir().join(format!("bard-catalog-{}.toml", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(SCHEMA.as_bytes()).unwrap();
    drop(file);

    let catalog = SchemaCatalog::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert!(catalog.table("sales").is_some());
}

#[test]
fn test_missing_file() {
    let err = SchemaCatalog::from_file("/definitely/not/here/schema.toml").unwrap_err();

    assert!(matches!(err, SchemaError::FileNotFound(_)));
}

#[test]
fn test_bad_granularity() {
    let schema = r#"
[[tables]]
name = "sales"
granularities = ["fortnight"]
"#;

    let err = SchemaCatalog::from_toml_str(schema).unwrap_err();

    assert!(matches!(err, SchemaError::ParseError(_)));
}
