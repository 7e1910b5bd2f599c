//! Serve command - Starts the HTTP server.

use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Cache, Database};

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    let db = Arc::new(
        Database::connect(&config)
            .await
            .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?,
    );

    let cache = connect_cache(&config).await;

    let app_state = AppState::from_config(db, cache, config);
    let app = create_router(app_state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}

/// Redis is optional: without it the server runs with auth rate limiting off.
async fn connect_cache(config: &Config) -> Option<Arc<Cache>> {
    let url = match &config.redis_url {
        Some(url) => url,
        None => {
            tracing::info!("REDIS_URL not set, auth rate limiting disabled");
            return None;
        }
    };

    match Cache::connect(url).await {
        Ok(cache) => Some(Arc::new(cache)),
        Err(e) => {
            tracing::warn!(error = %e, "Redis unavailable, auth rate limiting disabled");
            None
        }
    }
}
