//! Paging envelope for filtered list queries.
//!
//! # Invariants
//! - Page numbers are 1-indexed.
//! - `items.len() <= page_size`.
//! - A page past the end is empty but still reports `total_count`.

use super::validation::ValidationError;
use serde::Serialize;

/// Page size used when none (or zero) is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 5;
/// Largest accepted page size; larger requests are clamped.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Normalizes a configured page size according to list contract.
pub fn normalize_page_size(size: Option<u32>) -> u32 {
    match size {
        Some(0) | None => DEFAULT_PAGE_SIZE,
        Some(value) if value > MAX_PAGE_SIZE => MAX_PAGE_SIZE,
        Some(value) => value,
    }
}

/// Which slice of a list to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page_number: u32,
    page_size: u32,
}

impl PageRequest {
    /// Builds a request for `page_number` (1-indexed).
    ///
    /// `page_size` is normalized with [`normalize_page_size`].
    pub fn new(page_number: u32, page_size: Option<u32>) -> Result<Self, ValidationError> {
        if page_number == 0 {
            return Err(ValidationError::InvalidPage);
        }
        Ok(Self {
            page_number,
            page_size: normalize_page_size(page_size),
        })
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// SQL `LIMIT` value.
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    /// SQL `OFFSET` value.
    pub fn offset(&self) -> i64 {
        i64::from(self.page_number - 1) * i64::from(self.page_size)
    }
}

/// Bounded, ordered slice of a filtered list plus the total match count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_number: u32,
    pub page_size: u32,
    pub total_count: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_count: u64) -> Self {
        Self {
            items,
            page_number: request.page_number,
            page_size: request.page_size,
            total_count,
        }
    }

    /// Number of pages; an empty list still has one (empty) page.
    pub fn num_pages(&self) -> u64 {
        if self.total_count == 0 || self.page_size == 0 {
            return 1;
        }
        self.total_count.div_ceil(u64::from(self.page_size))
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page_number) < self.num_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.page_number > 1
    }
}
