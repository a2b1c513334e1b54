use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::{HavingError, HavingOperation};
use crate::filter::Arity;
use crate::model::{GroupedSet, LogicalMetric};

/// Havings grouped by metric, in first-seen metric order.
pub type Havings = GroupedSet<Arc<LogicalMetric>, ApiHaving>;

/// A predicate over an aggregated metric: `metric-operation[values]`.
///
/// Values are always finite, which makes `Eq` and `Hash` sound.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiHaving {
    metric: Arc<LogicalMetric>,
    operation: HavingOperation,
    values: Vec<f64>,
}

impl ApiHaving {
    pub fn new(
        metric: Arc<LogicalMetric>,
        operation: HavingOperation,
        values: Vec<f64>,
    ) -> Result<Self, HavingError> {
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(HavingError::MalformedHavingValue {
                value: bad.to_string(),
            });
        }

        let arity = operation.arity();
        let actual = values.len();
        if actual < arity.min() {
            return Err(HavingError::MissingHavingValues {
                operation,
                required: arity.min(),
                actual,
            });
        }
        if let Arity::Exactly(allowed) = arity {
            if actual > allowed {
                return Err(HavingError::HavingValueCount {
                    operation,
                    allowed,
                    actual,
                });
            }
        }

        Ok(Self {
            metric,
            operation,
            values,
        })
    }

    pub fn metric(&self) -> &Arc<LogicalMetric> {
        &self.metric
    }

    pub fn operation(&self) -> HavingOperation {
        self.operation
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl Eq for ApiHaving {}

impl Hash for ApiHaving {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.metric.hash(state);
        self.operation.hash(state);
        for value in &self.values {
            // -0.0 == 0.0, so both must hash alike
            let normalized = if *value == 0.0 { 0.0f64 } else { *value };
            normalized.to_bits().hash(state);
        }
    }
}

impl fmt::Display for ApiHaving {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<String> = self.values.iter().map(f64::to_string).collect();
        write!(
            f,
            "{}-{}[{}]",
            self.metric.name(),
            self.operation,
            values.join(",")
        )
    }
}

impl Serialize for ApiHaving {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ApiHaving", 3)?;
        state.serialize_field("metric", self.metric.name())?;
        state.serialize_field("operation", &self.operation)?;
        state.serialize_field("values", &self.values)?;
        state.end()
    }
}
