//! Shared types for list and write endpoints.

mod pagination;
mod response;

pub use pagination::{
    Paginated, PaginatedBookings, PaginatedHotels, PaginatedUsers, PaginationMeta,
    PaginationParams,
};
pub use response::{CountResponse, Created, MessageResponse, NoContent};
