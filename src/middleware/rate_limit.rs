use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::error::{AppError, RequestError};
use crate::middleware::logging::REQUEST_ID_HEADER;

/// Caps how many submissions are processed at once across the process.
#[derive(Debug)]
pub struct RequestLimiter {
    semaphore: Semaphore,
    total_requests: AtomicU64,
    rejected_requests: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimiterMetrics {
    pub total_requests: u64,
    pub rejected_requests: u64,
    pub available_permits: usize,
}

impl RequestLimiter {
    pub fn new(max_concurrent_requests: usize) -> Self {
        info!(
            max_concurrent_requests = max_concurrent_requests,
            "Initializing request limiter"
        );
        Self {
            semaphore: Semaphore::new(max_concurrent_requests),
            total_requests: AtomicU64::new(0),
            rejected_requests: AtomicU64::new(0),
        }
    }

    pub fn metrics(&self) -> LimiterMetrics {
        LimiterMetrics {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            rejected_requests: self.rejected_requests.load(Ordering::Relaxed),
            available_permits: self.semaphore.available_permits(),
        }
    }
}

pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RequestLimiter>>,
    request: Request,
    next: Next,
) -> Result<Response, RequestError> {
    let path = request.uri().path().to_string();

    // Only the API routes do real work.
    if !path.starts_with("/api/") {
        return Ok(next.run(request).await);
    }

    let total_requests = limiter.total_requests.fetch_add(1, Ordering::Relaxed) + 1;

    let _permit = limiter.semaphore.try_acquire().map_err(|_| {
        let rejected = limiter.rejected_requests.fetch_add(1, Ordering::Relaxed) + 1;
        warn!(
            path = path,
            total_requests = total_requests,
            rejected_requests = rejected,
            "Too many concurrent submissions"
        );
        let request_id = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        AppError::ServerBusy.for_request(request_id)
    })?;

    debug!(
        path = path,
        available_permits = limiter.semaphore.available_permits(),
        "Request permit acquired"
    );

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_limiter_metrics() {
        let limiter = RequestLimiter::new(3);
        assert_eq!(
            limiter.metrics(),
            LimiterMetrics {
                total_requests: 0,
                rejected_requests: 0,
                available_permits: 3,
            }
        );
    }

    #[test]
    fn test_permits_are_bounded() {
        let limiter = RequestLimiter::new(1);
        let held = limiter.semaphore.try_acquire().unwrap();
        assert!(limiter.semaphore.try_acquire().is_err());
        drop(held);
        assert_eq!(limiter.metrics().available_permits, 1);
    }
}
