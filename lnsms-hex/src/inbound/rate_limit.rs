//! Rate limiting middleware using Governor.
//!
//! Implements per-client-IP rate limiting with a token bucket algorithm.
//! The endpoints are unauthenticated (the claim code itself is the bearer
//! secret), so the client address is the only stable key available.

use std::net::SocketAddr;
use std::{num::NonZeroU32, sync::Arc, time::Duration};

use axum::{
    Json,
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde_json::json;

/// Rate limiter state shared across requests.
pub struct RateLimiterState {
    /// Per-client rate limiters
    limiters: DashMap<String, Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>>,
    /// Default quota for new clients
    quota: Quota,
    /// Advertised wait before retrying
    retry_after: Duration,
}

impl Default for RateLimiterState {
    fn default() -> Self {
        // 20 requests per 5 minutes per client.
        Self::new(20, Duration::from_secs(300))
    }
}

impl RateLimiterState {
    /// Creates a new rate limiter state.
    ///
    /// # Arguments
    /// * `requests` - Number of requests allowed per period
    /// * `period` - Time period for the quota
    pub fn new(requests: u32, period: Duration) -> Self {
        let quota = Quota::with_period(period)
            .unwrap()
            .allow_burst(NonZeroU32::new(requests).unwrap());

        Self {
            limiters: DashMap::new(),
            quota,
            retry_after: period,
        }
    }

    /// Checks if a request should be rate limited.
    /// Returns true if the request is allowed, false if rate limited.
    pub fn check(&self, key: &str) -> bool {
        let limiter = self
            .limiters
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(RateLimiter::direct(self.quota)));

        limiter.check().is_ok()
    }
}

/// Rate limiting middleware keyed by the client's remote address.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiterState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    // Skip rate limiting for health endpoint
    if request.uri().path() == "/health" {
        return next.run(request).await;
    }

    let key = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    if !limiter.check(&key) {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "error": "Rate limit exceeded. Please try again later.",
                "retry_after_seconds": limiter.retry_after.as_secs()
            })),
        )
            .into_response();
    }

    next.run(request).await
}
