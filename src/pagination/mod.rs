//! Pagination calculator
//!
//! Derives page boundaries from a record count, a requested page and a page
//! size. Pure arithmetic, recomputed on every listing request since the
//! record count may change between calls.
//!
//! Out-of-range pages are not an error: a stale cursor past the end is
//! clamped to the last page, and `previous_page` follows the clamped page.

use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};

/// Inputs of one page computation. `page` is zero-based and unclamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub total_records: u64,
    pub page: u64,
    pub size: NonZeroU64,
}

impl PageRequest {
    pub fn new(total_records: u64, page: u64, size: NonZeroU64) -> Self {
        Self {
            total_records,
            page,
            size,
        }
    }

    pub fn compute(&self) -> PageDescriptor {
        compute(self.total_records, self.page, self.size)
    }
}

/// Pagination metadata returned alongside a page of records. Absent
/// next/previous pages serialize as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDescriptor {
    pub total_records: u64,
    pub current_page: u64,
    pub total_pages: u64,
    pub next_page: Option<u64>,
    pub previous_page: Option<u64>,
}

impl PageDescriptor {
    /// Index of the first record on the current page.
    pub fn offset(&self, size: NonZeroU64) -> u64 {
        self.current_page.saturating_mul(size.get())
    }
}

/// Computes the page descriptor.
///
/// `total_pages` is `ceil(total_records / size)`. With no records the
/// bounds are those of a single empty page: `current_page` is 0 and there
/// is neither a next nor a previous page, while `total_pages` reports 0.
pub fn compute(total_records: u64, page: u64, size: NonZeroU64) -> PageDescriptor {
    let total_pages = total_records.div_ceil(size.get());
    let last_page = total_pages.max(1) - 1;
    let current_page = page.min(last_page);

    PageDescriptor {
        total_records,
        current_page,
        total_pages,
        next_page: current_page.checked_add(1).filter(|next| *next < total_pages),
        previous_page: current_page.checked_sub(1),
    }
}
