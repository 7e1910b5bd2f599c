//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_OFFSET, MAX_PAGE_SIZE};
use domain::{Booking, Hotel, UserResponse};

/// Pagination query parameters (reusable across all list endpoints)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number, starting at 1
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page, capped at 100
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_per_page() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl PaginationParams {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self { page, per_page }
    }

    /// Page number clamped to at least 1
    pub fn page(&self) -> u64 {
        self.page.max(1)
    }

    /// Calculate offset for database query, saturating for absurd page numbers
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.limit())
            .min(MAX_PAGE_OFFSET)
    }

    /// Zero-based page index for `Paginator::fetch_page`
    pub fn page_index(&self) -> u64 {
        self.offset() / self.limit()
    }

    /// Get limit capped at maximum
    pub fn limit(&self) -> u64 {
        self.per_page.clamp(1, MAX_PAGE_SIZE)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Serialize, ToSchema)]
#[aliases(
    PaginatedHotels = Paginated<Hotel>,
    PaginatedBookings = Paginated<Booking>,
    PaginatedUsers = Paginated<UserResponse>
)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    /// Create new paginated response
    pub fn new(data: Vec<T>, params: &PaginationParams, total: u64) -> Self {
        let per_page = params.limit();
        let total_pages = total.div_ceil(per_page);

        Self {
            data,
            meta: PaginationMeta {
                page: params.page(),
                per_page,
                total,
                total_pages,
            },
        }
    }

    /// Cut one page out of an already filtered list
    pub fn from_items(items: Vec<T>, params: &PaginationParams) -> Self {
        let total = items.len() as u64;
        let data = items
            .into_iter()
            .skip(usize::try_from(params.offset()).unwrap_or(usize::MAX))
            .take(params.limit() as usize)
            .collect();
        Self::new(data, params, total)
    }

    /// Convert the items, keeping the metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}
