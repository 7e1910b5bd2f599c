//! Rate limiting middleware using Redis cache.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;

use crate::api::AppState;
use crate::config::{RATE_LIMIT_AUTH_REQUESTS, RATE_LIMIT_AUTH_WINDOW_SECONDS};

/// Rate limit error response
#[derive(Debug)]
pub struct RateLimitError {
    pub retry_after: u64,
}

impl IntoResponse for RateLimitError {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert("Retry-After", HeaderValue::from(self.retry_after));
        headers.insert("X-RateLimit-Remaining", HeaderValue::from_static("0"));

        (
            StatusCode::TOO_MANY_REQUESTS,
            headers,
            "Too many requests. Please try again later.",
        )
            .into_response()
    }
}

/// Extract client identifier for rate limiting.
/// Uses X-Forwarded-For header if behind proxy, otherwise uses connection IP.
fn client_identifier(request: &Request) -> String {
    let header = |name: &str| {
        request
            .headers()
            .get(name)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string)
    };

    // First IP in the chain is the original client
    if let Some(ip) = header("X-Forwarded-For")
        .and_then(|f| f.split(',').next().map(|ip| ip.trim().to_string()))
        .filter(|ip| !ip.is_empty())
    {
        return ip;
    }

    if let Some(real_ip) = header("X-Real-IP") {
        return real_ip;
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Rate limiting for registration and login.
///
/// Without a configured cache the limit is not enforced. With one, a cache
/// failure denies the request.
pub async fn rate_limit_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    let Some(cache) = state.cache.as_ref() else {
        return Ok(next.run(request).await);
    };

    let client_id = client_identifier(&request);
    let key = format!("auth:{}", client_id);

    let (count, allowed) = match cache
        .check_rate_limit(&key, RATE_LIMIT_AUTH_REQUESTS, RATE_LIMIT_AUTH_WINDOW_SECONDS)
        .await
    {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(error = %e, "Auth rate limit check failed - denying request");
            return Err(RateLimitError {
                retry_after: RATE_LIMIT_AUTH_WINDOW_SECONDS,
            });
        }
    };

    if !allowed {
        tracing::warn!(client = %client_id, count, "Auth rate limit exceeded");
        return Err(RateLimitError {
            retry_after: RATE_LIMIT_AUTH_WINDOW_SECONDS,
        });
    }

    let mut response = next.run(request).await;

    let remaining = RATE_LIMIT_AUTH_REQUESTS.saturating_sub(count);
    response
        .headers_mut()
        .insert("X-RateLimit-Limit", HeaderValue::from(RATE_LIMIT_AUTH_REQUESTS));
    response
        .headers_mut()
        .insert("X-RateLimit-Remaining", HeaderValue::from(remaining));

    Ok(response)
}
