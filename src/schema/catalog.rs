//! In-memory schema catalog, loadable from TOML.
//!
//! ```toml
//! [[dimensions]]
//! name = "region"
//! key_field = "id"
//! fields = ["id", "desc"]
//!
//! [[metrics]]
//! name = "revenue"
//!
//! [[tables]]
//! name = "sales"
//! granularities = ["day", "month", "all"]
//! dimensions = ["region"]
//! metrics = ["revenue"]
//! ```

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::SchemaResolver;
use crate::model::{Dimension, Granularity, LogicalMetric, LogicalTable};

/// Errors raised while loading a schema catalog.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Schema file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read schema file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse schema file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Duplicate {kind} name: '{name}'")]
    DuplicateName { kind: &'static str, name: String },

    #[error("Table '{table}' references undefined {kind} '{name}'")]
    UndefinedReference {
        table: String,
        kind: &'static str,
        name: String,
    },
}

/// Serialized form of a catalog.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SchemaDefinition {
    pub dimensions: Vec<DimensionDefinition>,
    pub metrics: Vec<MetricDefinition>,
    pub tables: Vec<TableDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DimensionDefinition {
    pub name: String,
    #[serde(default = "default_key_field")]
    pub key_field: String,
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_key_field() -> String {
    "id".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricDefinition {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableDefinition {
    pub name: String,
    #[serde(default)]
    pub granularities: Vec<Granularity>,
    #[serde(default)]
    pub dimensions: Vec<String>,
    #[serde(default)]
    pub metrics: Vec<String>,
}

/// Dictionary of dimensions, metrics and tables.
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    dimensions: HashMap<String, Arc<Dimension>>,
    metrics: HashMap<String, Arc<LogicalMetric>>,
    tables: HashMap<String, Arc<LogicalTable>>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SchemaError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, SchemaError> {
        let definition: SchemaDefinition = toml::from_str(content)?;
        Self::from_definition(definition)
    }

    /// Build a catalog, checking names are unique and tables only reference
    /// defined dimensions and metrics.
    pub fn from_definition(definition: SchemaDefinition) -> Result<Self, SchemaError> {
        let mut catalog = SchemaCatalog::new();

        for def in definition.dimensions {
            let mut dimension =
                Dimension::new(&def.name, &def.key_field).with_fields(def.fields.iter().map(String::as_str));
            if let Some(description) = &def.description {
                dimension = dimension.with_description(description);
            }
            catalog.add_dimension(dimension)?;
        }

        for def in definition.metrics {
            let mut metric = LogicalMetric::new(&def.name);
            if let Some(category) = &def.category {
                metric = metric.with_category(category);
            }
            if let Some(description) = &def.description {
                metric = metric.with_description(description);
            }
            catalog.add_metric(metric)?;
        }

        for def in definition.tables {
            let mut table = LogicalTable::new(&def.name);
            for granularity in def.granularities {
                table = table.with_granularity(granularity);
            }
            for name in &def.dimensions {
                if !catalog.dimensions.contains_key(name) {
                    return Err(SchemaError::UndefinedReference {
                        table: def.name.clone(),
                        kind: "dimension",
                        name: name.clone(),
                    });
                }
                table = table.with_dimension(name);
            }
            for name in &def.metrics {
                if !catalog.metrics.contains_key(name) {
                    return Err(SchemaError::UndefinedReference {
                        table: def.name.clone(),
                        kind: "metric",
                        name: name.clone(),
                    });
                }
                table = table.with_metric(name);
            }
            catalog.add_table(table)?;
        }

        tracing::debug!(
            dimensions = catalog.dimensions.len(),
            metrics = catalog.metrics.len(),
            tables = catalog.tables.len(),
            "loaded schema catalog"
        );
        Ok(catalog)
    }

    pub fn add_dimension(&mut self, dimension: Dimension) -> Result<Arc<Dimension>, SchemaError> {
        insert_unique(&mut self.dimensions, "dimension", dimension.name().to_string(), dimension)
    }

    pub fn add_metric(&mut self, metric: LogicalMetric) -> Result<Arc<LogicalMetric>, SchemaError> {
        insert_unique(&mut self.metrics, "metric", metric.name().to_string(), metric)
    }

    pub fn add_table(&mut self, table: LogicalTable) -> Result<Arc<LogicalTable>, SchemaError> {
        insert_unique(&mut self.tables, "table", table.name().to_string(), table)
    }

    pub fn dimension(&self, name: &str) -> Option<&Arc<Dimension>> {
        self.dimensions.get(name)
    }

    pub fn metric(&self, name: &str) -> Option<&Arc<LogicalMetric>> {
        self.metrics.get(name)
    }

    pub fn table(&self, name: &str) -> Option<&Arc<LogicalTable>> {
        self.tables.get(name)
    }

    /// Table names in sorted order.
    pub fn table_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

fn insert_unique<T>(
    map: &mut HashMap<String, Arc<T>>,
    kind: &'static str,
    name: String,
    value: T,
) -> Result<Arc<T>, SchemaError> {
    if map.contains_key(&name) {
        return Err(SchemaError::DuplicateName { kind, name });
    }
    let value = Arc::new(value);
    map.insert(name, Arc::clone(&value));
    Ok(value)
}

impl SchemaResolver for SchemaCatalog {
    fn resolve_table(&self, name: &str) -> Option<Arc<LogicalTable>> {
        self.tables.get(name).cloned()
    }

    fn resolve_dimension(&self, name: &str, table: &LogicalTable) -> Option<Arc<Dimension>> {
        if !table.supports_dimension(name) {
            return None;
        }
        self.dimensions.get(name).cloned()
    }

    fn resolve_metric(&self, name: &str, table: &LogicalTable) -> Option<Arc<LogicalMetric>> {
        if !table.supports_metric(name) {
            return None;
        }
        self.metrics.get(name).cloned()
    }

    fn resolve_dimension_by_name(&self, name: &str) -> Option<Arc<Dimension>> {
        self.dimensions.get(name).cloned()
    }

    fn known_tables(&self) -> Vec<String> {
        self.table_names().into_iter().map(str::to_string).collect()
    }

    fn known_dimensions(&self) -> Vec<String> {
        let mut names: Vec<String> = self.dimensions.keys().cloned().collect();
        names.sort_unstable();
        names
    }
}
