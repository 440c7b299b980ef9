//! Table pagination

use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

/// Page numbers shown in the pager at once
pub const PAGE_WINDOW: usize = 5;

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based; 0 only when there are no items
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub page_window: Vec<usize>,
}

/// Slice `items` into the requested page
///
/// Page size defaults to 10 and is clamped to 1..=100. A page past the end
/// falls back to the first page.
pub fn paginate<T>(items: Vec<T>, page: Option<usize>, page_size: Option<usize>) -> Page<T> {
    let page_size = page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size);

    if total_pages == 0 {
        return Page {
            items: Vec::new(),
            page: 0,
            page_size,
            total_items: 0,
            total_pages: 0,
            page_window: Vec::new(),
        };
    }

    let mut page = page.unwrap_or(1).max(1);
    if page > total_pages {
        page = 1;
    }

    let start = (page - 1) * page_size;
    let items: Vec<T> = items.into_iter().skip(start).take(page_size).collect();

    Page {
        items,
        page,
        page_size,
        total_items,
        total_pages,
        page_window: page_window(page, total_pages, PAGE_WINDOW),
    }
}

/// At most `max_buttons` consecutive page numbers centred on `current`
pub fn page_window(current: usize, total_pages: usize, max_buttons: usize) -> Vec<usize> {
    if total_pages == 0 || max_buttons == 0 {
        return Vec::new();
    }
    let mut start = current.saturating_sub(max_buttons / 2).max(1);
    let mut end = start + max_buttons - 1;
    if end > total_pages {
        end = total_pages;
        start = (end + 1).saturating_sub(max_buttons).max(1);
    }
    (start..=end).collect()
}
