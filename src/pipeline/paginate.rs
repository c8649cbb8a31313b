//! Page arithmetic.
//!
//! Out-of-range pages produce an empty slice; they are never clamped to the
//! last page.

use serde::Serialize;

/// `ceil(total / page_size)`, or 0 when `page_size` is 0.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        0
    } else {
        total.div_ceil(page_size)
    }
}

/// Items of 1-based `page`. Page 0 is treated as page 1.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page.max(1).saturating_sub(1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// One rendered page of a locally filtered list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSlice<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    /// Number of items that passed the filters, across all pages.
    pub total: usize,
    pub total_pages: usize,
}

impl<T: Clone> PageSlice<T> {
    pub fn from_filtered(filtered: &[T], page: usize, page_size: usize) -> Self {
        Self {
            items: page_slice(filtered, page, page_size).to_vec(),
            page,
            page_size,
            total: filtered.len(),
            total_pages: total_pages(filtered.len(), page_size),
        }
    }
}
