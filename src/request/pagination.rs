use serde::Serialize;
use std::num::NonZeroU32;

use super::ParameterError;

/// Page size and one-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParameters {
    per_page: NonZeroU32,
    page: NonZeroU32,
}

impl PaginationParameters {
    pub fn new(per_page: NonZeroU32, page: NonZeroU32) -> Self {
        Self { per_page, page }
    }

    /// Parse raw `perPage` and `page` values. Both must be positive integers.
    pub fn parse(per_page: &str, page: &str) -> Result<Self, ParameterError> {
        Ok(Self::new(parse_positive(per_page)?, parse_positive(page)?))
    }

    pub fn per_page(&self) -> u32 {
        self.per_page.get()
    }

    pub fn page(&self) -> u32 {
        self.page.get()
    }

    /// Zero-based index of the first row on this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.get() - 1) * u64::from(self.per_page.get())
    }
}

/// Parse a strictly positive integer parameter.
pub fn parse_positive(raw: &str) -> Result<NonZeroU32, ParameterError> {
    raw.trim()
        .parse::<NonZeroU32>()
        .map_err(|_| ParameterError::NotPositive)
}
