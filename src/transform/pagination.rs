use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Fixed-size paging over an ordered row collection.
///
/// `page` is 0-based and always within `[0, total_pages - 1]`; an empty collection still
/// has one (empty) page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginator {
    page: usize,
    page_size: usize,
    total_rows: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 0,
            page_size: page_size.max(1),
            total_rows: 0,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// 1-based page number for display
    pub fn page_number(&self) -> usize {
        self.page + 1
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn total_pages(&self) -> usize {
        self.total_rows.div_ceil(self.page_size).max(1)
    }

    fn last_page(&self) -> usize {
        self.total_pages() - 1
    }

    /// Update the row count after the underlying collection changed, keeping the page in range
    pub fn resize(&mut self, total_rows: usize) {
        self.total_rows = total_rows;
        self.page = self.page.min(self.last_page());
    }

    /// Jump to a page; out-of-range requests (including negative ones) are clamped
    pub fn set_page(&mut self, page: isize) {
        self.page = if page < 0 {
            0
        } else {
            (page as usize).min(self.last_page())
        };
    }

    pub fn reset(&mut self) {
        self.page = 0;
    }

    pub fn next(&mut self) {
        self.page = (self.page + 1).min(self.last_page());
    }

    pub fn prev(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    pub fn has_next(&self) -> bool {
        self.page < self.last_page()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    /// Row range of the current page within the collection
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = (self.page * self.page_size).min(self.total_rows);
        let end = (start + self.page_size).min(self.total_rows);
        start..end
    }

    /// The current page of `rows`
    pub fn slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        slice_page(rows, self.page, self.page_size)
    }
}

/// Rows `[page * size, page * size + size)`, clamped to what exists
pub fn slice_page<T>(rows: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page.saturating_mul(page_size).min(rows.len());
    let end = start.saturating_add(page_size).min(rows.len());
    &rows[start..end]
}
