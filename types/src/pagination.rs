//! Page arithmetic derived from a list result.

/// Derived pagination state for the task table.
///
/// The page index is never clamped directly; the pager disables the buttons
/// that would leave the valid range instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    page_size: u32,
    total: u64,
}

impl Pagination {
    #[must_use]
    pub fn new(page: u32, page_size: u32, total: u64) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
            total,
        }
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// `ceil(total / page_size)`; zero when there are no results.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        let pages = self.total.div_ceil(u64::from(self.page_size));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn can_previous(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub fn can_next(&self) -> bool {
        let total_pages = self.total_pages();
        total_pages != 0 && self.page != total_pages
    }

    /// Target of the "Previous" button.
    #[must_use]
    pub fn previous_page(&self) -> u32 {
        self.page.saturating_sub(1).max(1)
    }

    /// Target of the "Next" button.
    #[must_use]
    pub fn next_page(&self) -> u32 {
        self.page.saturating_add(1).min(self.total_pages()).max(1)
    }

    /// Pager caption, e.g. `Page 2 of 3`. An empty result reads `Page 1 of 1`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("Page {} of {}", self.page, self.total_pages().max(1))
    }
}
