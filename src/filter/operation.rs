//! The fixed set of filter operations.

use serde::Serialize;
use std::fmt;

/// How many values an operation takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// No values; brackets may be omitted or left empty.
    Nullary,
    /// Exactly this many values.
    Exactly(usize),
    /// At least this many values.
    AtLeast(usize),
}

impl Arity {
    pub fn min(&self) -> usize {
        match self {
            Arity::Nullary => 0,
            Arity::Exactly(n) | Arity::AtLeast(n) => *n,
        }
    }

    /// Upper bound on the number of values, if any.
    pub fn max(&self) -> Option<usize> {
        match self {
            Arity::Nullary => Some(0),
            Arity::Exactly(n) => Some(*n),
            Arity::AtLeast(_) => None,
        }
    }
}

/// A filter operation. Names are matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperation {
    In,
    NotIn,
    Eq,
    Neq,
    StartsWith,
    Contains,
    Between,
    Gt,
    Gte,
    Lt,
    Lte,
    IsNull,
    NotNull,
}

impl FilterOperation {
    pub const ALL: [FilterOperation; 13] = [
        FilterOperation::In,
        FilterOperation::NotIn,
        FilterOperation::Eq,
        FilterOperation::Neq,
        FilterOperation::StartsWith,
        FilterOperation::Contains,
        FilterOperation::Between,
        FilterOperation::Gt,
        FilterOperation::Gte,
        FilterOperation::Lt,
        FilterOperation::Lte,
        FilterOperation::IsNull,
        FilterOperation::NotNull,
    ];

    /// Canonical name, used when rendering a clause.
    pub fn name(&self) -> &'static str {
        match self {
            FilterOperation::In => "in",
            FilterOperation::NotIn => "notin",
            FilterOperation::Eq => "eq",
            FilterOperation::Neq => "neq",
            FilterOperation::StartsWith => "startswith",
            FilterOperation::Contains => "contains",
            FilterOperation::Between => "between",
            FilterOperation::Gt => "gt",
            FilterOperation::Gte => "gte",
            FilterOperation::Lt => "lt",
            FilterOperation::Lte => "lte",
            FilterOperation::IsNull => "isnull",
            FilterOperation::NotNull => "notnull",
        }
    }

    /// Alternate names accepted by the parser.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            FilterOperation::Eq => &["equals"],
            FilterOperation::Neq => &["notequals"],
            FilterOperation::Gt => &["greaterthan"],
            FilterOperation::Gte => &["notlt"],
            FilterOperation::Lt => &["lessthan"],
            FilterOperation::Lte => &["notgt"],
            _ => &[],
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|op| op.name() == name || op.aliases().contains(&name.as_str()))
    }

    /// Every accepted name, canonical names first.
    pub fn all_names() -> impl Iterator<Item = &'static str> {
        Self::ALL
            .into_iter()
            .map(|op| op.name())
            .chain(Self::ALL.into_iter().flat_map(|op| op.aliases().iter().copied()))
    }

    pub fn arity(&self) -> Arity {
        match self {
            FilterOperation::IsNull | FilterOperation::NotNull => Arity::Nullary,
            FilterOperation::Between => Arity::Exactly(2),
            FilterOperation::Gt | FilterOperation::Gte | FilterOperation::Lt | FilterOperation::Lte => {
                Arity::Exactly(1)
            }
            FilterOperation::In
            | FilterOperation::NotIn
            | FilterOperation::Eq
            | FilterOperation::Neq
            | FilterOperation::StartsWith
            | FilterOperation::Contains => Arity::AtLeast(1),
        }
    }

    pub fn takes_values(&self) -> bool {
        self.arity() != Arity::Nullary
    }

    /// Whether value order is significant (range bounds).
    pub fn is_ordered(&self) -> bool {
        matches!(self, FilterOperation::Between)
    }
}

impl fmt::Display for FilterOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
