//! Client-side pagination

/// One page of a list that was fetched in full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// Items on this page
    pub items: &'a [T],

    /// 1-based page number, clamped to the available pages
    pub number: usize,

    /// Number of pages, at least one
    pub total_pages: usize,

    /// Number of items across all pages
    pub total_items: usize,
}

impl<T> Page<'_, T> {
    /// Check whether a later page exists.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    /// Check whether an earlier page exists.
    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

/// Slice `items` into the 1-based `page` of `per_page` items.
///
/// Page numbers below one go to the first page and past the end to the last.
/// A `per_page` of zero is treated as one.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> Page<'_, T> {
    let per_page = per_page.max(1);
    let total_pages = items.len().div_ceil(per_page).max(1);
    let number = page.clamp(1, total_pages);

    let start = (number - 1).saturating_mul(per_page).min(items.len());
    let end = start.saturating_add(per_page).min(items.len());

    Page {
        items: items.get(start..end).unwrap_or_default(),
        number,
        total_pages,
        total_items: items.len(),
    }
}
