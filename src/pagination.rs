//! Numbered page window for the pagination bar.

use std::fmt;

/// Pages kept on each side of the current one.
pub const WINDOW_DELTA: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

impl fmt::Display for PageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageItem::Page(n) => write!(f, "{}", n),
            PageItem::Ellipsis => f.write_str("…"),
        }
    }
}

/// Builds the window `1, page-delta..=page+delta, total_pages`.
///
/// A gap of exactly one page is filled with that page; anything larger
/// becomes an ellipsis.
pub fn page_window(page: u32, total_pages: u32, delta: u32) -> Vec<PageItem> {
    if total_pages <= 1 {
        return vec![PageItem::Page(1)];
    }
    let page = page.clamp(1, total_pages);

    let mut kept = vec![1];
    let lo = page.saturating_sub(delta).max(2);
    let hi = page.saturating_add(delta).min(total_pages - 1);
    kept.extend(lo..=hi);
    kept.push(total_pages);
    kept.dedup();

    let mut items = Vec::with_capacity(kept.len() + 2);
    let mut prev: Option<u32> = None;
    for n in kept {
        if let Some(p) = prev {
            match n - p {
                2 => items.push(PageItem::Page(p + 1)),
                gap if gap > 2 => items.push(PageItem::Ellipsis),
                _ => {}
            }
        }
        items.push(PageItem::Page(n));
        prev = Some(n);
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageItem::{Ellipsis as E, Page as P};

    #[test]
    fn middle_page_fills_gap_of_one() {
        assert_eq!(
            page_window(5, 10, WINDOW_DELTA),
            vec![P(1), P(2), P(3), P(4), P(5), P(6), P(7), E, P(10)]
        );
    }

    #[test]
    fn ellipsis_on_both_sides() {
        assert_eq!(
            page_window(10, 20, WINDOW_DELTA),
            vec![P(1), E, P(8), P(9), P(10), P(11), P(12), E, P(20)]
        );
    }

    #[test]
    fn first_and_last_pages() {
        assert_eq!(
            page_window(1, 10, WINDOW_DELTA),
            vec![P(1), P(2), P(3), E, P(10)]
        );
        assert_eq!(
            page_window(10, 10, WINDOW_DELTA),
            vec![P(1), E, P(8), P(9), P(10)]
        );
    }

    #[test]
    fn small_totals_list_every_page() {
        assert_eq!(page_window(1, 0, WINDOW_DELTA), vec![P(1)]);
        assert_eq!(page_window(1, 1, WINDOW_DELTA), vec![P(1)]);
        assert_eq!(page_window(2, 2, WINDOW_DELTA), vec![P(1), P(2)]);
        assert_eq!(
            page_window(3, 5, WINDOW_DELTA),
            vec![P(1), P(2), P(3), P(4), P(5)]
        );
    }

    #[test]
    fn out_of_range_page_is_clamped() {
        assert_eq!(page_window(99, 3, WINDOW_DELTA), vec![P(1), P(2), P(3)]);
    }

    #[test]
    fn display_uses_single_glyph_ellipsis() {
        let rendered: Vec<String> = page_window(1, 9, 1).iter().map(|i| i.to_string()).collect();
        assert_eq!(rendered, vec!["1", "2", "…", "9"]);
    }
}
