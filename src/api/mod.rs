//! API layer - HTTP handlers and middleware
//!
//! This module contains all HTTP-related concerns:
//! - Request handlers
//! - Middleware (authentication, capability guards, rate limiting)
//! - Custom extractors
//! - Route definitions

/// Route layer admitting only callers whose role grants `$capability`.
macro_rules! guard {
    ($capability:expr) => {
        axum::middleware::from_fn(
            |request: axum::extract::Request, next: axum::middleware::Next| {
                $crate::api::middleware::require_capability($capability, request, next)
            },
        )
    };
}

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
