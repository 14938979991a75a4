//! Pagination cursor over the loaded prefix of the collection.

/// Bookkeeping for how much of the filtered collection has been loaded.
///
/// `offset` is always one page past the last page received, so a reset only
/// takes effect once the first page of the new result arrives. After every
/// update `has_more() == offset < total` holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    offset: usize,
    page_size: usize,
    total: usize,
}

impl PageCursor {
    pub fn new(page_size: usize) -> Self {
        Self {
            offset: 0,
            page_size: page_size.max(1),
            total: 0,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn has_more(&self) -> bool {
        self.offset < self.total
    }

    /// Records a page fetched at `fetched_at`: the cursor moves one page past it.
    pub fn settle(&mut self, fetched_at: usize, total: usize) {
        self.offset = fetched_at + self.page_size;
        self.total = total;
    }

}
