//! Schema metadata types shared by the parsers and the request model.

pub mod dimension;
pub mod grouped;
pub mod metric;
pub mod table;
pub mod time;

pub use dimension::{Dimension, DimensionField};
pub use grouped::{GroupKey, GroupedSet};
pub use metric::{LogicalMetric, RATIO_METRIC_CATEGORY};
pub use table::LogicalTable;
pub use time::{Granularity, Interval, TimeError, TimeGrain, TimeZone};
