//! Page requests, page responses and the text-filter rule shared by the
//! listing query and its count query.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Filters shorter than this many characters (after trimming) are ignored.
pub const MIN_FILTER_CHARS: usize = 3;

/// Largest page a client may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// A request for one window of a filtered listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, Validate)]
pub struct PageRequest {
    #[validate(range(min = 0))]
    pub page_number: i64,
    #[validate(range(min = 1, max = 100))]
    pub page_size: i64,
    #[serde(default)]
    pub text_filter: String,
}

impl PageRequest {
    /// Number of rows to skip: `page_number * page_size`.
    pub fn offset(&self) -> i64 {
        self.page_number.saturating_mul(self.page_size)
    }

    /// Window size; identical to `page_size`.
    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

/// One page of results plus the total number of rows matching the filter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PageResponse<T> {
    pub result: Vec<T>,
    pub total: i64,
}

/// The filter that actually applies to a query, if any.
///
/// The raw value is trimmed; when fewer than [`MIN_FILTER_CHARS`] characters
/// remain the listing is unfiltered.
pub fn effective_filter(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (trimmed.chars().count() >= MIN_FILTER_CHARS).then_some(trimmed)
}

/// Build an `ILIKE` pattern that matches `filter` as a literal substring.
pub fn contains_pattern(filter: &str) -> String {
    let mut pattern = String::with_capacity(filter.len() + 2);
    pattern.push('%');
    for ch in filter.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
