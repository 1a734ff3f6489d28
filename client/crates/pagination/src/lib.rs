//! Offset page cursor primitives for listing views.
//!
//! A [`PageCursor`] captures the `page`, `limit` and `skip` triple that a
//! listing view keeps in its navigable location. The cursor encodes to and
//! decodes from a URL query string (`page=0&limit=10&skip=0`) so the current
//! position survives a reload, and it produces the [`FetchWindow`] sent to the
//! listing endpoint.
//!
//! Forward and backward steps keep `skip = page * limit`. A location that was
//! edited by hand may break that relationship; decoding accepts such cursors
//! as long as every value is a non-negative integer and `limit` is non-zero.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::form_urlencoded;

/// Number of records requested per page when a location does not say.
pub const DEFAULT_LIMIT: u32 = 10;

const PAGE_KEY: &str = "page";
const LIMIT_KEY: &str = "limit";
const SKIP_KEY: &str = "skip";

/// Errors raised while decoding a cursor from a query string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    /// A cursor parameter was present but not a non-negative integer.
    #[error("query parameter `{name}` must be a non-negative integer, got `{value}`")]
    InvalidNumber {
        /// Name of the offending query parameter.
        name: &'static str,
        /// Raw value found in the query string.
        value: String,
    },
    /// `limit=0` would request empty pages forever.
    #[error("query parameter `limit` must be greater than zero")]
    ZeroLimit,
}

/// The `limit`/`skip` pair sent to a paged listing endpoint.
///
/// # Examples
/// ```
/// use pagination::PageCursor;
///
/// let window = PageCursor::first(10).next().window();
/// assert_eq!((window.limit, window.skip), (10, 10));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchWindow {
    /// Maximum number of records to return.
    pub limit: u32,
    /// Number of records to skip from the start of the collection.
    pub skip: u32,
}

/// Position of a listing view expressed as page number, page size and offset.
///
/// ## Invariants
/// - `limit` is never zero.
/// - [`PageCursor::next`] and [`PageCursor::previous`] preserve
///   `skip = page * limit` when it already holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageCursor {
    page: u32,
    limit: u32,
    skip: u32,
}

impl PageCursor {
    /// Cursor for the first page with the given page size.
    ///
    /// A zero `limit` is raised to one.
    #[must_use]
    pub const fn first(limit: u32) -> Self {
        let limit = if limit == 0 { 1 } else { limit };
        Self {
            page: 0,
            limit,
            skip: 0,
        }
    }

    /// Build a cursor from raw parts without checking `skip = page * limit`.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::ZeroLimit`] when `limit` is zero.
    pub const fn from_parts(page: u32, limit: u32, skip: u32) -> Result<Self, CursorError> {
        if limit == 0 {
            return Err(CursorError::ZeroLimit);
        }
        Ok(Self { page, limit, skip })
    }

    /// Zero-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Offset of the first record on this page.
    #[must_use]
    pub const fn skip(&self) -> u32 {
        self.skip
    }

    /// Whether this cursor points at page zero.
    #[must_use]
    pub const fn is_first_page(&self) -> bool {
        self.page == 0
    }

    /// Whether `skip = page * limit` holds.
    #[must_use]
    pub const fn is_aligned(&self) -> bool {
        match self.page.checked_mul(self.limit) {
            Some(expected) => expected == self.skip,
            None => false,
        }
    }

    /// Step one page forward.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageCursor;
    ///
    /// let next = PageCursor::first(10).next();
    /// assert_eq!((next.page(), next.skip()), (1, 10));
    /// ```
    #[must_use]
    pub const fn next(self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            limit: self.limit,
            skip: self.skip.saturating_add(self.limit),
        }
    }

    /// Step one page backward, or `None` on page zero.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageCursor;
    ///
    /// assert!(PageCursor::first(10).previous().is_none());
    /// let back = PageCursor::first(10).next().previous();
    /// assert_eq!(back, Some(PageCursor::first(10)));
    /// ```
    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        if self.page == 0 {
            return None;
        }
        Some(Self {
            page: self.page - 1,
            limit: self.limit,
            skip: self.skip.saturating_sub(self.limit),
        })
    }

    /// The `limit`/`skip` pair for the listing request.
    #[must_use]
    pub const fn window(&self) -> FetchWindow {
        FetchWindow {
            limit: self.limit,
            skip: self.skip,
        }
    }

    /// Encode as `page=..&limit=..&skip=..`.
    #[must_use]
    pub fn to_query(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair(PAGE_KEY, &self.page.to_string())
            .append_pair(LIMIT_KEY, &self.limit.to_string())
            .append_pair(SKIP_KEY, &self.skip.to_string())
            .finish()
    }

    /// Decode a cursor from a query string, with or without the leading `?`.
    ///
    /// Missing parameters fall back to `page=0`, `limit=`[`DEFAULT_LIMIT`] and
    /// `skip=0`; unrelated parameters are ignored and the last occurrence of a
    /// repeated parameter wins.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError`] when a parameter is not a non-negative integer
    /// or `limit` is zero.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageCursor;
    ///
    /// let cursor = PageCursor::from_query("?page=2&limit=10&skip=20")?;
    /// assert_eq!(cursor.page(), 2);
    /// # Ok::<(), pagination::CursorError>(())
    /// ```
    pub fn from_query(query: &str) -> Result<Self, CursorError> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut page = 0;
        let mut limit = DEFAULT_LIMIT;
        let mut skip = 0;
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                PAGE_KEY => page = parse_param(PAGE_KEY, &value)?,
                LIMIT_KEY => limit = parse_param(LIMIT_KEY, &value)?,
                SKIP_KEY => skip = parse_param(SKIP_KEY, &value)?,
                _ => {}
            }
        }
        Self::from_parts(page, limit, skip)
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::first(DEFAULT_LIMIT)
    }
}

impl fmt::Display for PageCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query())
    }
}

impl FromStr for PageCursor {
    type Err = CursorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_query(s)
    }
}

fn parse_param(name: &'static str, value: &str) -> Result<u32, CursorError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| CursorError::InvalidNumber {
            name,
            value: value.to_owned(),
        })
}
