//! Pagination primitives.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Default page size when the caller does not specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A validated, 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Validate a page request. Pages start at 1.
    pub fn new(page: u32, page_size: u32) -> DomainResult<Self> {
        if page == 0 {
            return Err(DomainError::validation("page numbers start at 1"));
        }
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(DomainError::validation(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        Ok(Self { page, page_size })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results plus enough totals to render a pager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            page: request.page,
            page_size: request.page_size,
            total,
            total_pages: total.div_ceil(u64::from(request.page_size)),
        }
    }

    pub fn has_more(&self) -> bool {
        u64::from(self.page) < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_page_zero_and_oversized_pages() {
        assert!(matches!(PageRequest::new(0, 10), Err(DomainError::Validation(_))));
        assert!(matches!(PageRequest::new(1, 0), Err(DomainError::Validation(_))));
        assert!(matches!(
            PageRequest::new(1, MAX_PAGE_SIZE + 1),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn offsets_are_one_based() {
        assert_eq!(PageRequest::new(1, 10).unwrap().offset(), 0);
        assert_eq!(PageRequest::new(3, 10).unwrap().offset(), 20);
    }

    #[test]
    fn twenty_three_rows_make_three_pages() {
        let req = PageRequest::new(1, 10).unwrap();
        let page = Page::new(vec![(); 10], req, 23);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_more());

        let last = Page::new(vec![(); 3], PageRequest::new(3, 10).unwrap(), 23);
        assert!(!last.has_more());
    }

    #[test]
    fn empty_store_has_no_pages() {
        let page: Page<()> = Page::new(vec![], PageRequest::default(), 0);
        assert_eq!(page.total_pages, 0);
    }
}
