//! Sort parameters: `column[|asc|desc]`, comma separated, highest priority first.

use serde::{Serialize, Serializer};
use std::fmt;

use super::ParameterError;
use crate::grammar::split_top_level;

/// Pseudo-column naming the time bucket of each result row.
pub const DATE_TIME_STRING: &str = "dateTime";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn parse(s: &str) -> Result<Self, ParameterError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(ParameterError::UnknownSortDirection(s.to_string())),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => f.write_str("asc"),
            SortDirection::Desc => f.write_str("desc"),
        }
    }
}

/// What a sort orders by.
///
/// Columns are kept by name; whether they refer to something the request
/// actually selects is decided by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SortColumn {
    DateTime,
    Metric(String),
    DimensionField { dimension: String, field: String },
}

impl SortColumn {
    /// `dateTime`, `<dimension>.<field>`, or a metric name.
    pub fn parse(s: &str) -> Result<Self, ParameterError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParameterError::MalformedSort(s.to_string()));
        }
        if s == DATE_TIME_STRING {
            return Ok(SortColumn::DateTime);
        }
        match s.split_once('.') {
            Some((dimension, field)) if !dimension.is_empty() && !field.is_empty() => {
                Ok(SortColumn::DimensionField {
                    dimension: dimension.to_string(),
                    field: field.to_string(),
                })
            }
            Some(_) => Err(ParameterError::MalformedSort(s.to_string())),
            None => Ok(SortColumn::Metric(s.to_string())),
        }
    }

    pub fn is_date_time(&self) -> bool {
        matches!(self, SortColumn::DateTime)
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortColumn::DateTime => f.write_str(DATE_TIME_STRING),
            SortColumn::Metric(name) => f.write_str(name),
            SortColumn::DimensionField { dimension, field } => write!(f, "{}.{}", dimension, field),
        }
    }
}

impl Serialize for SortColumn {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One sort column with its direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct OrderByColumn {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl OrderByColumn {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    pub fn asc(column: SortColumn) -> Self {
        Self::new(column, SortDirection::Asc)
    }

    pub fn desc(column: SortColumn) -> Self {
        Self::new(column, SortDirection::Desc)
    }

    /// Parse `column` or `column|direction`; the direction defaults to `desc`.
    pub fn parse(s: &str) -> Result<Self, ParameterError> {
        let (column, direction) = match s.split_once('|') {
            Some((column, direction)) => (column, SortDirection::parse(direction)?),
            None => (s, SortDirection::default()),
        };
        Ok(Self::new(SortColumn::parse(column)?, direction))
    }
}

impl fmt::Display for OrderByColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.column, self.direction)
    }
}

/// Parse a delimited sort list in priority order.
pub fn parse_sorts(query: &str, delimiter: char) -> Result<Vec<OrderByColumn>, ParameterError> {
    split_top_level(query, delimiter)
        .into_iter()
        .map(OrderByColumn::parse)
        .collect()
}
