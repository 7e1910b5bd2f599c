//! API middleware.

mod auth;
mod rate_limit;

pub use auth::{auth_middleware, require_capability, CurrentUser};
pub use rate_limit::rate_limit_auth_middleware;
