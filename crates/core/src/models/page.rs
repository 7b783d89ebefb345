//! Paginated list envelope and per-view page state.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Listed;

/// Pagination block of a list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page (1-based).
    pub page: u32,
    /// Maximum items per page.
    pub limit: u32,
    /// Total items across all pages.
    pub total: u64,
    /// Number of pages.
    pub pages: u32,
}

impl Pagination {
    /// Build the pagination block for `total` items split into pages of
    /// `limit`.
    #[must_use]
    pub fn for_total(page: u32, limit: u32, total: u64) -> Self {
        let pages = if limit == 0 {
            0
        } else {
            u32::try_from(total.div_ceil(u64::from(limit))).unwrap_or(u32::MAX)
        };
        Self {
            page,
            limit,
            total,
            pages,
        }
    }

    /// Whether a page after the current one exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.pages
    }

    /// Whether a page before the current one exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Errors raised when a list envelope does not satisfy its invariants.
#[derive(thiserror::Error, Debug)]
pub enum PageError {
    /// The body is not a JSON object.
    #[error("list response is not an object")]
    NotAnObject,

    /// A required key is missing.
    #[error("list response is missing '{0}'")]
    MissingField(&'static str),

    /// An item or the pagination block failed to decode.
    #[error("list response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    /// The server reported a zero page size.
    #[error("list response has a page limit of zero")]
    ZeroLimit,

    /// More items than the page limit.
    #[error("list response has {items} items but a limit of {limit}")]
    ItemsExceedLimit {
        /// Items received.
        items: usize,
        /// Page limit reported.
        limit: u32,
    },

    /// `pages` disagrees with `ceil(total / limit)`.
    #[error("list response reports {pages} pages, expected {expected}")]
    PageCountMismatch {
        /// Pages reported.
        pages: u32,
        /// Pages implied by total and limit.
        expected: u32,
    },
}

/// One page of a list endpoint.
///
/// Invariants (checked by [`Page::from_envelope`] and [`Page::new`]):
/// - `items.len() <= pagination.limit`
/// - `pagination.pages == ceil(pagination.total / pagination.limit)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    items: Vec<T>,
    pagination: Pagination,
}

impl<T> Page<T> {
    /// Build a page, checking the envelope invariants.
    ///
    /// # Errors
    ///
    /// Returns [`PageError`] if the limit is zero, there are more items than
    /// the limit, or the page count does not match the total.
    pub fn new(items: Vec<T>, pagination: Pagination) -> Result<Self, PageError> {
        if pagination.limit == 0 {
            return Err(PageError::ZeroLimit);
        }
        let limit = usize::try_from(pagination.limit).unwrap_or(usize::MAX);
        if items.len() > limit {
            return Err(PageError::ItemsExceedLimit {
                items: items.len(),
                limit: pagination.limit,
            });
        }
        let expected = Pagination::for_total(pagination.page, pagination.limit, pagination.total).pages;
        if pagination.pages != expected {
            return Err(PageError::PageCountMismatch {
                pages: pagination.pages,
                expected,
            });
        }
        Ok(Self { items, pagination })
    }

    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page and return its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// The pagination block.
    #[must_use]
    pub const fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// Whether this page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Listed> Page<T> {
    /// Decode a wire envelope `{ "<collection>": [...], "pagination": {...} }`.
    ///
    /// # Errors
    ///
    /// Returns [`PageError`] if a key is missing, a value fails to decode,
    /// or the invariants do not hold.
    pub fn from_envelope(body: Value) -> Result<Self, PageError> {
        let Value::Object(mut map) = body else {
            return Err(PageError::NotAnObject);
        };
        let items = map
            .remove(T::COLLECTION)
            .ok_or(PageError::MissingField(T::COLLECTION))?;
        let pagination = map
            .remove("pagination")
            .ok_or(PageError::MissingField("pagination"))?;

        let items: Vec<T> = serde_json::from_value(items)?;
        let pagination: Pagination = serde_json::from_value(pagination)?;
        Self::new(items, pagination)
    }
}

/// Page position owned by a single list view.
///
/// Each screen keeps its own `Pager`; nothing about the current page is
/// shared between views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: u32,
    limit: u32,
}

impl Pager {
    /// Start at page 1 with the given page size (at least 1).
    #[must_use]
    pub fn new(limit: u32) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
        }
    }

    /// Start at `page` (at least 1) without knowing the page count yet,
    /// e.g. a page number from a URL or command line.
    #[must_use]
    pub fn at(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Current page (1-based).
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Advance if the last response says another page exists.
    pub const fn next(&mut self, last: &Pagination) -> bool {
        if self.page < last.pages {
            self.page += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page unless already on the first.
    pub const fn previous(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to `page`, clamped to `1..=last.pages`.
    pub fn go_to(&mut self, page: u32, last: &Pagination) {
        self.page = page.clamp(1, last.pages.max(1));
    }

    /// Back to the first page (e.g. after a filter change).
    pub const fn reset(&mut self) {
        self.page = 1;
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(10)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::Location;

    fn location(id: &str) -> Value {
        json!({ "_id": id, "name": "HQ", "address": "1 Main St", "isActive": true })
    }

    #[test]
    fn test_pages_is_ceiling_of_total_over_limit() {
        assert_eq!(Pagination::for_total(1, 10, 0).pages, 0);
        assert_eq!(Pagination::for_total(1, 10, 1).pages, 1);
        assert_eq!(Pagination::for_total(1, 10, 10).pages, 1);
        assert_eq!(Pagination::for_total(1, 10, 11).pages, 2);
        assert_eq!(Pagination::for_total(1, 3, 41_200).pages, 13_734);
    }

    #[test]
    fn test_from_envelope() {
        let body = json!({
            "locations": [location("a"), location("b")],
            "pagination": { "page": 1, "limit": 10, "total": 2, "pages": 1 }
        });
        let page = Page::<Location>::from_envelope(body).unwrap();
        assert_eq!(page.items().len(), 2);
        assert_eq!(page.pagination().total, 2);
        assert!(!page.pagination().has_next());
    }

    #[test]
    fn test_from_envelope_rejects_too_many_items() {
        let body = json!({
            "locations": [location("a"), location("b")],
            "pagination": { "page": 1, "limit": 1, "total": 2, "pages": 2 }
        });
        assert!(matches!(
            Page::<Location>::from_envelope(body),
            Err(PageError::ItemsExceedLimit { items: 2, limit: 1 })
        ));
    }

    #[test]
    fn test_from_envelope_rejects_wrong_page_count() {
        let body = json!({
            "locations": [],
            "pagination": { "page": 1, "limit": 10, "total": 25, "pages": 2 }
        });
        assert!(matches!(
            Page::<Location>::from_envelope(body),
            Err(PageError::PageCountMismatch {
                pages: 2,
                expected: 3
            })
        ));
    }

    #[test]
    fn test_from_envelope_requires_collection_key() {
        let body = json!({
            "meals": [],
            "pagination": { "page": 1, "limit": 10, "total": 0, "pages": 0 }
        });
        assert!(matches!(
            Page::<Location>::from_envelope(body),
            Err(PageError::MissingField("locations"))
        ));
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        let pagination = Pagination {
            page: 1,
            limit: 0,
            total: 0,
            pages: 0,
        };
        assert!(matches!(
            Page::<Location>::new(vec![], pagination),
            Err(PageError::ZeroLimit)
        ));
    }

    #[test]
    fn test_pager_stays_in_bounds() {
        let last = Pagination::for_total(1, 10, 25);
        let mut pager = Pager::new(10);

        assert!(!pager.previous());
        assert!(pager.next(&last));
        assert!(pager.next(&last));
        assert!(!pager.next(&last));
        assert_eq!(pager.page(), 3);

        pager.go_to(99, &last);
        assert_eq!(pager.page(), 3);
        pager.go_to(0, &last);
        assert_eq!(pager.page(), 1);
    }

    #[test]
    fn test_pager_limit_is_at_least_one() {
        assert_eq!(Pager::new(0).limit(), 1);
        assert_eq!(Pager::at(0, 0), Pager::new(1));
        assert_eq!(Pager::at(4, 20).page(), 4);
    }
}
