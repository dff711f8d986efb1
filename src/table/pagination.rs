//! Page-number sequence for pagination controls.
//!
//! The sequence always starts with page 1 and ends with the last page, shows a
//! window of [`DELTA`] pages on each side of the current page, and collapses
//! the gaps on either side into a single ellipsis.

use std::fmt;

/// Pages shown on each side of the current page.
pub const DELTA: usize = 2;

/// One element of the pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageToken {
    Page(usize),
    Ellipsis,
}

impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageToken::Page(n) => write!(f, "{}", n),
            PageToken::Ellipsis => f.write_str("..."),
        }
    }
}

/// Number of pages needed for `total_items`. Zero items means zero pages.
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    total_items.div_ceil(page_size)
}

/// Clamp a requested page into `[1, max(total_pages, 1)]`.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Build the page tokens for `current_page`.
///
/// With one page or fewer the result is `[1]`. `current_page` is expected to
/// be clamped already; out-of-range values still produce a well-formed
/// sequence.
pub fn page_range(current_page: usize, total_items: usize, page_size: usize) -> Vec<PageToken> {
    let last = total_pages(total_items, page_size);
    if last <= 1 {
        return vec![PageToken::Page(1)];
    }

    let lower = current_page.saturating_sub(DELTA).max(2);
    let upper = current_page.saturating_add(DELTA).min(last - 1);

    let mut tokens = Vec::with_capacity(2 * DELTA + 5);
    tokens.push(PageToken::Page(1));

    if current_page.saturating_sub(DELTA) > 2 {
        tokens.push(PageToken::Ellipsis);
    }

    tokens.extend((lower..=upper).map(PageToken::Page));

    if current_page.saturating_add(DELTA) < last - 1 {
        tokens.push(PageToken::Ellipsis);
    }

    tokens.push(PageToken::Page(last));
    tokens
}
