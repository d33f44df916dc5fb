// Pagination cursor and windowing
use serde::Serialize;
use std::ops::Range;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Cursor shared by every paginated table.
///
/// `total_pages` is always `max(1, ceil(total_items / page_size))` and
/// `current_page` always lies in `1..=total_pages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationState {
    current_page: usize,
    page_size: usize,
    total_items: usize,
    total_pages: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PaginationState {
    /// A zero page size is bumped to one.
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
            total_items: 0,
            total_pages: 1,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Requests a page; it is clamped on the next recomputation.
    pub fn go_to(&mut self, page: usize) {
        self.current_page = page.max(1);
    }

    /// Returns false when already on the first page.
    pub fn previous(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.current_page -= 1;
        true
    }

    /// Returns false when already on the last page.
    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.current_page += 1;
        true
    }

    /// Changes the page size, keeping the cursor on a valid page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.recompute(self.total_items);
    }

    /// Adopts a new item count, clamping the cursor into range.
    pub fn recompute(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.total_pages = total_items.div_ceil(self.page_size).max(1);
        self.current_page = self.current_page.clamp(1, self.total_pages);
    }

    /// Recomputes for `total_items` and returns the index window of the current page.
    pub fn window(&mut self, total_items: usize) -> Range<usize> {
        self.recompute(total_items);
        let start = ((self.current_page - 1) * self.page_size).min(total_items);
        let end = (start + self.page_size).min(total_items);
        start..end
    }
}

/// One page of a collection together with the cursor that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: PaginationState,
}

/// Slices page `page` (1-based) out of `collection`, clamping out-of-range pages.
pub fn paginate<T: Clone>(collection: &[T], page: usize, page_size: usize) -> Page<T> {
    let mut pagination = PaginationState::new(page_size);
    pagination.go_to(page);
    let range = pagination.window(collection.len());
    Page {
        items: collection[range].to_vec(),
        pagination,
    }
}

/// Same as [`paginate`] but drives an existing cursor, which keeps the clamped page.
pub fn paginate_with<T: Clone>(collection: &[T], cursor: &mut PaginationState) -> Page<T> {
    let page = paginate(collection, cursor.current_page(), cursor.page_size());
    *cursor = page.pagination;
    page
}
