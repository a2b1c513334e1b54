// src/model/metric.rs
use serde::Serialize;
use std::hash::{Hash, Hasher};

/// Category name shared by ratio metrics.
pub const RATIO_METRIC_CATEGORY: &str = "Ratios";

/// A named, computable quantity exposed by logical tables.
#[derive(Debug, Clone, Serialize)]
pub struct LogicalMetric {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl LogicalMetric {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            category: None,
            description: None,
        }
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_ratio(&self) -> bool {
        self.category.as_deref() == Some(RATIO_METRIC_CATEGORY)
    }
}

impl PartialEq for LogicalMetric {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for LogicalMetric {}

impl Hash for LogicalMetric {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}
