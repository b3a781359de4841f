//! Client-side paging over an ordered collection.
//!
//! Pages are 1-based. Nothing here clamps the requested page: asking for a
//! page past the end yields an empty slice and callers decide what to do.

use std::num::NonZeroUsize;

/// Rows per page used by the admin screens
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(5) {
    Some(n) => n,
    None => unreachable!(),
};

/// One page of a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub visible: &'a [T],
    pub total_pages: usize,
    pub current_page: usize,
}

/// Total number of pages; an empty collection still has one (empty) page.
pub fn total_pages(len: usize, page_size: NonZeroUsize) -> usize {
    len.div_ceil(page_size.get()).max(1)
}

/// Slice out `current_page` of `items`.
pub fn paginate<T>(items: &[T], page_size: NonZeroUsize, current_page: usize) -> Page<'_, T> {
    let size = page_size.get();
    let visible = match current_page.checked_sub(1) {
        Some(zero_based) => {
            let start = zero_based.saturating_mul(size).min(items.len());
            let end = start.saturating_add(size).min(items.len());
            &items[start..end]
        }
        None => &items[..0],
    };

    Page {
        visible,
        total_pages: total_pages(items.len(), page_size),
        current_page,
    }
}

/// Page to show after one item was removed from `current_page`.
///
/// `remaining_len` is the collection length after the removal. When nothing is
/// left on the current page and there is a page before it, step back one page.
pub fn page_after_removal(
    current_page: usize,
    remaining_len: usize,
    page_size: NonZeroUsize,
) -> usize {
    let first_index = current_page.saturating_sub(1).saturating_mul(page_size.get());
    if current_page > 1 && remaining_len <= first_index {
        current_page - 1
    } else {
        current_page
    }
}
