//! Page requests and offset/limit bounds
//!
//! Query parameters arrive as signed integers so that negative values reach
//! [`PageRequest::new`] and are rejected there instead of producing bounds the
//! store cannot handle.
//!
//! ```rust
//! use item_service::repository::{PageRequest, Pagination, SortField, SortDirection, SortSpec};
//!
//! let sort = SortSpec::by(SortField::Name, SortDirection::Ascending);
//! let request = PageRequest::new(2, 25, sort).unwrap();
//! assert_eq!(request.pagination(), Pagination::new(50, 25));
//! ```

use thiserror::Error;

use super::sort::SortSpec;

/// Error produced while validating paging parameters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    /// Page index below zero
    #[error("page index must not be negative (got {0})")]
    NegativePage(i64),

    /// Page size of zero or below
    #[error("page size must be greater than zero (got {0})")]
    NonPositiveSize(i64),

    /// `page * size` does not fit the store's offset type
    #[error("page {page} with size {size} is out of range")]
    Overflow {
        /// Requested page index
        page: i64,
        /// Requested page size
        size: i64,
    },
}

/// Offset/limit bounds handed to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Number of results to skip
    pub offset: u64,
    /// Maximum number of results to return
    pub limit: u64,
}

impl Pagination {
    /// Create new pagination bounds
    #[must_use]
    pub const fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// Bounds of the first page with the given size
    #[must_use]
    pub const fn first_page(limit: u64) -> Self {
        Self { offset: 0, limit }
    }
}

/// Validated request for one page of a sorted listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    size: u64,
    offset: u64,
    sort: SortSpec,
}

impl PageRequest {
    /// Validate a zero-based page index and a page size
    ///
    /// The offset `page * size` must fit in an `i64`, the widest integer the
    /// document store accepts for `START`.
    pub fn new(page: i64, size: i64, sort: SortSpec) -> Result<Self, PageError> {
        if page < 0 {
            return Err(PageError::NegativePage(page));
        }
        if size <= 0 {
            return Err(PageError::NonPositiveSize(size));
        }
        let offset = page
            .checked_mul(size)
            .ok_or(PageError::Overflow { page, size })?;

        // all three are non-negative here
        Ok(Self {
            page: page.unsigned_abs(),
            size: size.unsigned_abs(),
            offset: offset.unsigned_abs(),
            sort,
        })
    }

    /// Zero-based page index
    #[must_use]
    pub fn page(&self) -> u64 {
        self.page
    }

    /// Requested page size
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Sort applied before slicing
    #[must_use]
    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    /// Offset/limit bounds of this page
    #[must_use]
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.offset, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::sort::{SortDirection, SortField};

    fn by_name() -> SortSpec {
        SortSpec::by(SortField::Name, SortDirection::Ascending)
    }

    #[test]
    fn test_first_page() {
        let request = PageRequest::new(0, 100, by_name()).unwrap();
        assert_eq!(request.pagination(), Pagination::first_page(100));
        assert_eq!(request.page(), 0);
        assert_eq!(request.size(), 100);
    }

    #[test]
    fn test_offset_is_page_times_size() {
        let request = PageRequest::new(3, 7, by_name()).unwrap();
        assert_eq!(request.pagination(), Pagination::new(21, 7));
    }

    #[test]
    fn test_negative_page_rejected() {
        assert_eq!(
            PageRequest::new(-1, 10, by_name()),
            Err(PageError::NegativePage(-1))
        );
    }

    #[test]
    fn test_zero_and_negative_size_rejected() {
        assert_eq!(
            PageRequest::new(0, 0, by_name()),
            Err(PageError::NonPositiveSize(0))
        );
        assert_eq!(
            PageRequest::new(0, -5, by_name()),
            Err(PageError::NonPositiveSize(-5))
        );
    }

    #[test]
    fn test_overflow_rejected() {
        assert_eq!(
            PageRequest::new(i64::MAX, 2, by_name()),
            Err(PageError::Overflow {
                page: i64::MAX,
                size: 2
            })
        );
    }

    #[test]
    fn test_large_but_representable_offset() {
        let request = PageRequest::new(i64::MAX, 1, by_name()).unwrap();
        assert_eq!(request.pagination().offset, i64::MAX as u64);
    }
}
