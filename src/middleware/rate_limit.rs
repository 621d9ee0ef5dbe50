use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

/// Fixed-window per-process limiter, one window per route group. Coarse on
/// purpose: it shields the store from request floods, not from distributed
/// abuse.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    scope: &'static str,
    rps: u32,
    window: Arc<Mutex<Window>>,
}

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

impl RateLimiter {
    pub fn new(scope: &'static str, rps: u32) -> Self {
        Self {
            scope,
            rps: rps.max(1),
            window: Arc::new(Mutex::new(Window {
                started: Instant::now(),
                count: 0,
            })),
        }
    }

    fn allow(&self) -> bool {
        let mut window = self.window.lock().expect("rate limiter mutex poisoned");
        let now = Instant::now();
        if now.duration_since(window.started) >= Duration::from_secs(1) {
            window.started = now;
            window.count = 0;
        }
        if window.count < self.rps {
            window.count += 1;
            true
        } else {
            false
        }
    }
}

pub async fn rps_middleware(
    State(limiter): State<RateLimiter>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if !limiter.allow() {
        tracing::warn!(scope = limiter.scope, rps = limiter.rps, "Rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "success": false, "error": "rate_limit_exceeded" })),
        )
            .into_response();
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_caps_at_configured_rps() {
        let limiter = RateLimiter::new("test", 3);
        assert!(limiter.allow());
        assert!(limiter.allow());
        assert!(limiter.allow());
        assert!(!limiter.allow());
    }

    #[test]
    fn zero_rps_still_admits_one() {
        let limiter = RateLimiter::new("test", 0);
        assert!(limiter.allow());
        assert!(!limiter.allow());
    }
}
