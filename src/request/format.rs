//! Response format and asynchronous execution parameters.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::ParameterError;

/// Response format requested by the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Json,
    JsonApi,
    Csv,
    Debug,
}

impl ResponseFormat {
    pub fn name(&self) -> &'static str {
        match self {
            ResponseFormat::Json => "json",
            ResponseFormat::JsonApi => "jsonapi",
            ResponseFormat::Csv => "csv",
            ResponseFormat::Debug => "debug",
        }
    }
}

impl FromStr for ResponseFormat {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ResponseFormat::Json),
            "jsonapi" => Ok(ResponseFormat::JsonApi),
            "csv" => Ok(ResponseFormat::Csv),
            "debug" => Ok(ResponseFormat::Debug),
            _ => Err(ParameterError::UnknownFormat),
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// When a request should switch to asynchronous delivery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AsyncAfter {
    /// Always answer synchronously.
    #[default]
    Never,
    /// Always answer asynchronously.
    Always,
    /// Go asynchronous after this many milliseconds.
    After(u64),
}

impl FromStr for AsyncAfter {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("never") {
            return Ok(AsyncAfter::Never);
        }
        if s.eq_ignore_ascii_case("always") {
            return Ok(AsyncAfter::Always);
        }
        s.parse::<u64>()
            .map(AsyncAfter::After)
            .map_err(|_| ParameterError::InvalidAsyncAfter)
    }
}

impl fmt::Display for AsyncAfter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsyncAfter::Never => f.write_str("never"),
            AsyncAfter::Always => f.write_str("always"),
            AsyncAfter::After(ms) => write!(f, "{}", ms),
        }
    }
}

impl Serialize for AsyncAfter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AsyncAfter {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
