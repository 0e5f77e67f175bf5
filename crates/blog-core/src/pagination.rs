//! Page arithmetic for listings.
//!
//! Out-of-range pages are clamped to the nearest valid page rather than
//! rejected.

use serde::Serialize;

use crate::validation::{FieldError, ValidationErrors};

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

/// A requested page, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Build a request from raw query values.
    ///
    /// A missing, zero or negative page becomes page 1. The page size must
    /// lie in `1..=max_page_size`.
    pub fn new(
        page: Option<i64>,
        page_size: Option<i64>,
        default_page_size: u64,
        max_page_size: u64,
    ) -> Result<Self, ValidationErrors> {
        let page = match page {
            Some(p) if p >= 1 => p as u64,
            _ => 1,
        };

        let page_size = match page_size {
            None => default_page_size,
            Some(size) if size >= 1 && (size as u64) <= max_page_size => size as u64,
            Some(_) => {
                return Err(FieldError::new(
                    "page_size",
                    format!("Page size must be between 1 and {max_page_size}."),
                )
                .into());
            }
        };

        Ok(Self { page, page_size })
    }
}

/// Pagination metadata returned with every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_count: u64,
    pub page_size: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl PageMeta {
    /// Resolve a request against the total row count, clamping the page.
    pub fn resolve(total_count: u64, request: PageRequest) -> Self {
        let page_size = request.page_size.max(1);
        let total_pages = total_count.div_ceil(page_size);
        let current_page = request.page.clamp(1, total_pages.max(1));

        Self {
            current_page,
            total_pages,
            total_count,
            page_size,
            has_next: current_page < total_pages,
            has_previous: current_page > 1,
        }
    }

    /// Number of rows to skip before this page.
    pub fn offset(&self) -> u64 {
        (self.current_page - 1) * self.page_size
    }

    /// Maximum number of rows on this page.
    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

/// One page of items plus its metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

/// Slice an already ordered sequence into the requested page.
pub fn paginate<T: Clone>(items: &[T], request: PageRequest) -> Page<T> {
    let meta = PageMeta::resolve(items.len() as u64, request);
    let start = (meta.offset() as usize).min(items.len());
    let end = (start + meta.limit() as usize).min(items.len());

    Page {
        items: items[start..end].to_vec(),
        meta,
    }
}
