//! Hotel booking marketplace backend.
//!
//! Guests browse hotels and reserve rooms, hoteliers manage listings and
//! their bookings, and admins moderate the platform.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **services**: Use cases (booking, moderation, reviews, notifications)
//! - **infra**: Database, migrations, repositories and Redis
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! Entities and business rules live in the `domain` workspace crate.
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Bootstrap the first administrator
//! cargo run -- create-admin --email admin@example.com --password 'Admin#Pass1'
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::{create_router, AppState};
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use infra::{Cache, Database};
