//! Offset pagination primitives shared by listing endpoints.
//!
//! Callers parse optional `page`/`limit` query values into a validated
//! [`PageRequest`], hand it to a repository, and wrap the returned slice in a
//! [`Page`] whose [`PageInfo`] carries the totals clients render.

use serde::{Deserialize, Serialize};

/// Largest page size a client may request.
pub const MAX_LIMIT: u32 = 100;

/// First page number; pages are one-based.
pub const FIRST_PAGE: u32 = 1;

/// Validation failures raised while building a [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// The page number was zero.
    #[error("page must be at least 1")]
    PageOutOfRange,
    /// The limit was zero or above [`MAX_LIMIT`].
    #[error("limit must be between 1 and 100")]
    LimitOutOfRange,
}

/// Raw pagination parameters as they arrive on a query string.
///
/// # Examples
/// ```
/// use pagination::PageParams;
///
/// let params = PageParams { page: None, limit: Some(5) };
/// let request = params.into_request(10).unwrap();
/// assert_eq!(request.page(), 1);
/// assert_eq!(request.limit(), 5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PageParams {
    /// One-based page number; defaults to the first page.
    pub page: Option<u32>,
    /// Requested page size; defaults to the caller-supplied default.
    pub limit: Option<u32>,
}

impl PageParams {
    /// Resolve defaults and validate ranges.
    ///
    /// # Errors
    /// Returns [`PaginationError`] when either value is out of range.
    pub fn into_request(self, default_limit: u32) -> Result<PageRequest, PaginationError> {
        PageRequest::new(
            self.page.unwrap_or(FIRST_PAGE),
            self.limit.unwrap_or(default_limit),
        )
    }
}

/// Validated one-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Validate a page number and page size.
    ///
    /// # Errors
    /// Returns [`PaginationError`] when `page` is zero or `limit` is outside
    /// `1..=MAX_LIMIT`.
    pub const fn new(page: u32, limit: u32) -> Result<Self, PaginationError> {
        if page < FIRST_PAGE {
            return Err(PaginationError::PageOutOfRange);
        }
        if limit == 0 || limit > MAX_LIMIT {
            return Err(PaginationError::LimitOutOfRange);
        }
        Ok(Self { page, limit })
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of records to skip before this page starts.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - FIRST_PAGE) * u64::from(self.limit)
    }
}

/// Totals describing a page within the full result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// One-based page number that was served.
    pub page: u32,
    /// Page size that was applied.
    pub limit: u32,
    /// Total records matching the query across all pages.
    pub total: u64,
    /// `ceil(total / limit)`; zero when there are no records.
    pub total_pages: u64,
}

impl PageInfo {
    /// Compute the totals for `request` given the full record count.
    ///
    /// # Examples
    /// ```
    /// use pagination::{PageInfo, PageRequest};
    ///
    /// let info = PageInfo::new(PageRequest::new(1, 10).unwrap(), 21);
    /// assert_eq!(info.total_pages, 3);
    /// ```
    #[must_use]
    pub fn new(request: PageRequest, total: u64) -> Self {
        Self {
            page: request.page,
            limit: request.limit,
            total,
            total_pages: total.div_ceil(u64::from(request.limit)),
        }
    }
}

/// A page of items plus its [`PageInfo`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    items: Vec<T>,
    info: PageInfo,
}

impl<T> Page<T> {
    /// Wrap the items served for `request` out of `total` matches.
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            info: PageInfo::new(request, total),
        }
    }

    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Totals for this page.
    #[must_use]
    pub const fn info(&self) -> PageInfo {
        self.info
    }

    /// Transform each item while keeping the totals.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            info: self.info,
        }
    }

    /// Split into items and totals.
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, PageInfo) {
        (self.items, self.info)
    }
}
