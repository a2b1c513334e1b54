//! Shared schema fixture for integration tests.
#![allow(dead_code)]

use bard::config::Settings;
use bard::model::LogicalTable;
use bard::request::{build_data_request, DataApiRequest, RequestParameters};
use bard::schema::{SchemaCatalog, SchemaResolver};
use std::sync::Arc;

pub const SCHEMA: &str = r#"
[[dimensions]]
name = "region"
fields = ["id", "desc"]

[[dimensions]]
name = "product"
key_field = "sku"
fields = ["sku", "name", "category"]

[[dimensions]]
name = "status"
fields = ["id", "desc"]

[[dimensions]]
name = "age"
key_field = "bucket"

[[metrics]]
name = "revenue"

[[metrics]]
name = "clicks"

[[metrics]]
name = "ctr"
category = "Ratios"

[[tables]]
name = "sales"
granularities = ["all", "hour", "day", "week", "month"]
dimensions = ["region", "product", "status"]
metrics = ["revenue", "clicks", "ctr"]

[[tables]]
name = "audience"
granularities = ["day"]
dimensions = ["age"]
metrics = ["clicks"]
"#;

pub fn catalog() -> SchemaCatalog {
    SchemaCatalog::from_toml_str(SCHEMA).unwrap()
}

pub fn sales(catalog: &SchemaCatalog) -> Arc<LogicalTable> {
    catalog.resolve_table("sales").unwrap()
}

pub fn params(table: &str) -> RequestParameters {
    RequestParameters {
        table: table.to_string(),
        ..Default::default()
    }
}

/// A request against `sales` that passes validation.
pub fn valid_params() -> RequestParameters {
    RequestParameters {
        granularity: Some("day".into()),
        dimensions: Some("region(id|desc),product".into()),
        metrics: Some("revenue,clicks".into()),
        intervals: Some("2024-01-01/2024-02-01".into()),
        ..params("sales")
    }
}

pub fn build(catalog: &SchemaCatalog, params: &RequestParameters) -> DataApiRequest {
    build_data_request(params, catalog, &Settings::default()).unwrap()
}
