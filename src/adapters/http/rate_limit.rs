//! Fixed-window per-session rate limiting.
//!
//! In-memory counters; one window per key. Suitable for a single
//! server process.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

/// Fixed-window counter limiter.
pub struct FixedWindowLimiter {
    max_requests: u32,
    window: Duration,
    counters: Arc<Mutex<HashMap<String, WindowState>>>,
}

#[derive(Debug, Clone, Copy)]
struct WindowState {
    window_start: Instant,
    count: u32,
}

impl FixedWindowLimiter {
    /// `max_requests` per `window` per key.
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            counters: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Records one request and returns whether it is allowed.
    pub async fn allow(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut counters = self.counters.lock().await;

        let state = counters.entry(key.to_string()).or_insert(WindowState {
            window_start: now,
            count: 0,
        });

        if now.duration_since(state.window_start) >= self.window {
            state.window_start = now;
            state.count = 0;
        }

        state.count += 1;
        state.count <= self.max_requests
    }
}
