//! Requested-page bookkeeping for list screens

use crate::slice::SliceView;

/// The page a list screen asks the backend for next
///
/// Navigation methods return whether the requested page changed, so callers
/// only refetch when it did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pager {
    page: u32,
}

impl Pager {
    /// Start at `initial_page`
    #[must_use]
    pub const fn new(initial_page: u32) -> Self {
        Self { page: initial_page }
    }

    /// Currently requested zero-based page
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Jump to `page`
    pub const fn go_to_page(&mut self, page: u32) -> bool {
        let changed = self.page != page;
        self.page = page;
        changed
    }

    /// Step back one page, stopping at zero
    pub const fn go_to_prev_page(&mut self) -> bool {
        if self.page == 0 {
            return false;
        }
        self.page -= 1;
        true
    }

    /// Step forward one page while `view` says more pages are known
    pub fn go_to_next_page<T>(&mut self, view: &SliceView<'_, T>) -> bool {
        let total_pages = view.pagination_state().total_pages;
        if total_pages == 0 || self.page >= total_pages - 1 {
            return false;
        }
        self.page += 1;
        true
    }

    /// Back to page zero, e.g. after a filter change
    pub const fn reset_to_first_page(&mut self) -> bool {
        self.go_to_page(0)
    }
}
