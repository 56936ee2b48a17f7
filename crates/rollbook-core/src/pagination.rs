//! Pagination utilities for API responses.
//!
//! Listing endpoints use page-based pagination with a **0-indexed** page:
//!
//! - `page`: Page index (0-indexed, default: 0)
//! - `size`: Items per page (at least 1, default: 10)
//!
//! A request for page `p` with size `s` covers the half-open item range
//! `[p * s, p * s + s)` of the filtered and sorted result set. A negative
//! page or a size below one is rejected rather than adjusted.
//!
//! # Example
//!
//! ```ignore
//! use rollbook_core::pagination::{PageMeta, PageParams};
//!
//! // GET /api/students?page=2&size=10
//! let params = PageParams { page: Some(2), size: Some(10) };
//! assert_eq!(params.offset(), 20);
//!
//! let (page, size) = params.checked()?;
//! let meta = PageMeta::new(page, size, 25);
//! assert_eq!(meta.total_pages, 3);
//! assert!(!meta.has_more);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::serde::deserialize_optional_i64;

/// Page size used when the request does not specify one.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// A page request that cannot address any item range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequestError {
    NegativePage(i64),
    SizeBelowOne(i64),
}

impl fmt::Display for PageRequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageRequestError::NegativePage(_) => {
                f.write_str("Page index must not be less than zero")
            }
            PageRequestError::SizeBelowOne(_) => {
                f.write_str("Page size must not be less than one")
            }
        }
    }
}

impl std::error::Error for PageRequestError {}

/// Metadata about a paginated response.
///
/// # Example JSON Response
///
/// ```json
/// {
///   "page": 2,
///   "size": 10,
///   "total_items": 25,
///   "total_pages": 3,
///   "has_more": false
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PageMeta {
    /// Current page index (0-indexed)
    pub page: i64,
    /// Items per page (the size that was applied)
    pub size: i64,
    /// Total number of items across all pages
    pub total_items: i64,
    /// Number of pages, `ceil(total_items / size)`
    pub total_pages: i64,
    /// Whether there are more items after this page
    pub has_more: bool,
}

impl PageMeta {
    #[must_use]
    pub fn new(page: i64, size: i64, total_items: i64) -> Self {
        let total_pages = total_pages(total_items, size);
        Self {
            page,
            size,
            total_items,
            total_pages,
            has_more: page.saturating_add(1) < total_pages,
        }
    }
}

/// Number of pages needed to hold `total_items` at `size` items per page.
///
/// An empty set has zero pages.
#[must_use]
pub fn total_pages(total_items: i64, size: i64) -> i64 {
    if size <= 0 || total_items <= 0 {
        return 0;
    }
    (total_items + size - 1) / size
}

/// Query parameters for page-based pagination.
///
/// # Limits
///
/// - `page` must be 0 or greater
/// - `size` must be 1 or greater; large sizes are honored as requested
///
/// Empty strings in the query string are treated as absent.
#[derive(Debug, Clone, Hash, Deserialize, ToSchema)]
pub struct PageParams {
    /// Page index (0-indexed, default: 0)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    /// Items per page (at least 1, default: 10)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub size: Option<i64>,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: Some(0),
            size: Some(DEFAULT_PAGE_SIZE),
        }
    }
}

impl PageParams {
    /// Requested page index, defaulting to 0.
    #[must_use]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(0)
    }

    /// Requested page size, defaulting to [`DEFAULT_PAGE_SIZE`].
    #[must_use]
    pub fn size(&self) -> i64 {
        self.size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Returns `(page, size)` when both address a valid item range.
    pub fn checked(&self) -> Result<(i64, i64), PageRequestError> {
        let (page, size) = (self.page(), self.size());
        if page < 0 {
            return Err(PageRequestError::NegativePage(page));
        }
        if size < 1 {
            return Err(PageRequestError::SizeBelowOne(size));
        }
        Ok((page, size))
    }

    /// Number of items skipped before the requested page.
    #[must_use]
    pub fn offset(&self) -> i64 {
        self.page().max(0).saturating_mul(self.size().max(0))
    }
}
