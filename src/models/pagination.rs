//! Pagination types shared by listing reads.

use serde::{Deserialize, Serialize};

/// A 1-based page request.
///
/// # Example
///
/// ```
/// use payroll_engine::models::Page;
///
/// let page = Page::new(3, 10);
/// assert_eq!(page.offset(), 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Page {
    /// The page number, starting at 1.
    pub page: usize,
    /// The maximum number of items per page.
    pub limit: usize,
}

impl Page {
    /// Creates a page request. Page 0 is treated as page 1.
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page: page.max(1),
            limit,
        }
    }

    /// The number of items to skip. Saturates instead of overflowing.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

/// One page of results along with the total number of matching items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// The number of items across all pages.
    pub total: usize,
}

impl<T: Clone> Paginated<T> {
    /// Slices an already ordered collection.
    pub fn from_slice(all: &[T], page: Page) -> Self {
        let items = all
            .iter()
            .skip(page.offset())
            .take(page.limit)
            .cloned()
            .collect();
        Self {
            items,
            total: all.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_zero_is_first_page() {
        assert_eq!(Page::new(0, 10).offset(), 0);
        assert_eq!(Page::new(1, 10).offset(), 0);
    }

    #[test]
    fn test_huge_page_saturates() {
        assert_eq!(Page::new(usize::MAX, usize::MAX).offset(), usize::MAX);
        assert_eq!(Page::new(usize::MAX, 0).offset(), 0);

        let all: Vec<u32> = (1..=5).collect();
        let page = Paginated::from_slice(&all, Page::new(usize::MAX / 2, 10));
        assert!(page.items.is_empty());
        assert_eq!(page.total, 5);
    }

    #[test]
    fn test_from_slice_last_partial_page() {
        let all: Vec<u32> = (1..=25).collect();
        let page = Paginated::from_slice(&all, Page::new(3, 10));
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.total, 25);
    }

    #[test]
    fn test_from_slice_past_end_is_empty() {
        let all: Vec<u32> = (1..=5).collect();
        let page = Paginated::from_slice(&all, Page::new(4, 10));
        assert!(page.items.is_empty());
        assert_eq!(page.total, 5);
    }
}
