use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::warn;

use super::error::ApiError;
use super::AppState;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window request counter per client address.
#[derive(Debug)]
pub struct RateLimiter {
    window: Duration,
    max_requests: u32,
    clients: Mutex<HashMap<IpAddr, Window>>,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Counts one request from `client` at `now`; `false` once the client
    /// has used up its window.
    pub fn check(&self, client: IpAddr, now: Instant) -> bool {
        let mut clients = self.clients.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        // expired windows would otherwise accumulate forever
        clients.retain(|_, w| now.duration_since(w.started) < self.window);

        let entry = clients.entry(client).or_insert(Window { started: now, count: 0 });
        entry.count += 1;
        entry.count <= self.max_requests
    }
}

pub async fn rate_limit(State(state): State<Arc<AppState>>, request: Request, next: Next) -> Response {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    if !state.limiter.check(client, Instant::now()) {
        warn!("Rate limit exceeded for {}", client);
        return ApiError::RateLimited.into_response();
    }

    next.run(request).await
}
