use crate::filter::Arity;
use serde::Serialize;
use std::fmt;

/// Numeric comparison applied to an aggregated metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HavingOperation {
    Eq,
    Neq,
    Gt,
    Lt,
    Gte,
    Lte,
    Between,
    NotBetween,
}

impl HavingOperation {
    pub const ALL: [HavingOperation; 8] = [
        HavingOperation::Eq,
        HavingOperation::Neq,
        HavingOperation::Gt,
        HavingOperation::Lt,
        HavingOperation::Gte,
        HavingOperation::Lte,
        HavingOperation::Between,
        HavingOperation::NotBetween,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            HavingOperation::Eq => "eq",
            HavingOperation::Neq => "neq",
            HavingOperation::Gt => "gt",
            HavingOperation::Lt => "lt",
            HavingOperation::Gte => "gte",
            HavingOperation::Lte => "lte",
            HavingOperation::Between => "between",
            HavingOperation::NotBetween => "notbetween",
        }
    }

    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            HavingOperation::Eq => &["equalto"],
            HavingOperation::Neq => &["notequalto"],
            HavingOperation::Gt => &["greaterthan"],
            HavingOperation::Lt => &["lessthan"],
            HavingOperation::Gte => &["notlessthan"],
            HavingOperation::Lte => &["notgreaterthan"],
            HavingOperation::Between | HavingOperation::NotBetween => &[],
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|op| op.name() == name || op.aliases().contains(&name.as_str()))
    }

    pub fn all_names() -> impl Iterator<Item = &'static str> {
        Self::ALL
            .into_iter()
            .map(|op| op.name())
            .chain(Self::ALL.into_iter().flat_map(|op| op.aliases().iter().copied()))
    }

    pub fn arity(&self) -> Arity {
        match self {
            HavingOperation::Between | HavingOperation::NotBetween => Arity::Exactly(2),
            _ => Arity::AtLeast(1),
        }
    }
}

impl fmt::Display for HavingOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
