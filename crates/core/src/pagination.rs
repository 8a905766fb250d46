//! Page-number pagination arithmetic.

use crate::error::CoreError;

/// Fixed number of results per page on every paginated endpoint.
pub const PAGE_SIZE: i64 = 20;

/// Largest page number whose offset fits in an `i64`.
pub const MAX_PAGE: i64 = i64::MAX / PAGE_SIZE;

/// Parse the `page` query parameter. Absent means page 1.
///
/// Anything that is not an integer in `1..=MAX_PAGE` is an invalid page.
pub fn parse_page(raw: Option<&str>) -> Result<i64, CoreError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(1),
        Some(s) => match s.parse::<i64>() {
            Ok(page) if (1..=MAX_PAGE).contains(&page) => Ok(page),
            _ => Err(CoreError::PageNotFound),
        },
    }
}

/// Position of one page within a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub page: i64,
    pub count: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl PageInfo {
    /// Validate `page` against the total `count`.
    ///
    /// Page 1 always exists, even for an empty result set.
    pub fn new(page: i64, count: i64) -> Result<Self, CoreError> {
        let last = last_page(count);
        if page < 1 || page > last {
            return Err(CoreError::PageNotFound);
        }
        Ok(Self {
            page,
            count,
            has_next: page < last,
            has_previous: page > 1,
        })
    }
}

fn last_page(count: i64) -> i64 {
    ((count + PAGE_SIZE - 1) / PAGE_SIZE).max(1)
}
