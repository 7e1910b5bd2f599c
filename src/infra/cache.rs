//! Redis cache implementation.
//!
//! Holds the fixed-window counters behind auth rate limiting.

use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};

use crate::config::CACHE_PREFIX_RATE_LIMIT;
use crate::errors::{AppError, AppResult};

/// Redis cache wrapper with connection pooling.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
}

impl Cache {
    /// Connect to Redis.
    pub async fn connect(redis_url: &str) -> Result<Self, RedisError> {
        let client = Client::open(redis_url)?;
        let connection = ConnectionManager::new(client).await?;

        tracing::info!("Redis cache connected");

        Ok(Self { connection })
    }

    /// Check connectivity for health reporting.
    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(cache_error)?;
        Ok(())
    }

    /// Check if a key exists in cache.
    pub async fn exists(&self, key: &str) -> AppResult<bool> {
        let mut conn = self.connection.clone();
        let exists: bool = conn.exists(key).await.map_err(cache_error)?;
        Ok(exists)
    }

    /// Check and increment rate limit counter.
    /// Returns (current_count, is_allowed) tuple.
    pub async fn check_rate_limit(
        &self,
        identifier: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<(u64, bool)> {
        let key = rate_limit_key(identifier);
        let mut conn = self.connection.clone();

        let count: i64 = conn.incr(&key, 1).await.map_err(cache_error)?;
        if count == 1 {
            // First request opens the window
            let _: () = conn
                .expire(&key, window_seconds as i64)
                .await
                .map_err(cache_error)?;
        }

        let count = count.max(0) as u64;
        Ok((count, count <= max_requests))
    }

    /// Get remaining requests in rate limit window.
    pub async fn get_rate_limit_remaining(
        &self,
        identifier: &str,
        max_requests: u64,
    ) -> AppResult<u64> {
        let key = rate_limit_key(identifier);
        if !self.exists(&key).await? {
            return Ok(max_requests);
        }

        let mut conn = self.connection.clone();
        let count: Option<i64> = conn.get(&key).await.map_err(cache_error)?;
        let count = count.unwrap_or(0).max(0) as u64;

        Ok(max_requests.saturating_sub(count))
    }
}

fn rate_limit_key(identifier: &str) -> String {
    format!("{}{}", CACHE_PREFIX_RATE_LIMIT, identifier)
}

/// Convert Redis error to AppError.
fn cache_error(e: RedisError) -> AppError {
    tracing::error!("Redis error: {}", e);
    AppError::internal(format!("Cache error: {}", e))
}
