//! HTTP surface: `/api/search`, `/api/health` and a banner at `/`.

pub mod error;
pub mod handlers;
pub mod rate_limit;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use axum::middleware;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

use crate::config::Config;
use crate::search::fallback::FALLBACK_ID;
use crate::search::Orchestrator;
use rate_limit::RateLimiter;

pub struct AppState {
    pub config: Config,
    pub orchestrator: Arc<Orchestrator>,
    pub limiter: RateLimiter,
    pub started: Instant,
}

impl AppState {
    pub fn new(config: Config, orchestrator: Orchestrator) -> Self {
        let limiter = RateLimiter::new(
            Duration::from_secs(config.server.rate_limit_window_secs),
            config.server.rate_limit_max_requests,
        );
        Self {
            config,
            orchestrator: Arc::new(orchestrator),
            limiter,
            started: Instant::now(),
        }
    }

    /// The cascade as configured, fallback last.
    pub fn methods(&self) -> Vec<String> {
        self.orchestrator
            .strategy_ids()
            .into_iter()
            .chain(std::iter::once(FALLBACK_ID))
            .map(str::to_string)
            .collect()
    }

    pub fn features(&self) -> Vec<&'static str> {
        let mut features = vec!["header-rotation", "human-timing", "multi-supplier"];
        if self.config.render.enabled {
            features.push("headless-rendering");
        }
        features.push("sample-fallback");
        features
    }
}

/// Whether `origin` is allowed by an entry of `allowed`. Entries shaped like
/// `https://*.vercel.app` accept any subdomain over the same scheme.
pub fn origin_allowed(origin: &str, allowed: &[String]) -> bool {
    allowed.iter().any(|entry| match entry.split_once("://*.") {
        Some((scheme, suffix)) => origin
            .strip_prefix(scheme)
            .and_then(|rest| rest.strip_prefix("://"))
            .and_then(|host| host.strip_suffix(suffix))
            .is_some_and(|sub| sub.len() > 1 && sub.ends_with('.')),
        None => entry == origin,
    })
}

fn cors_layer(allowed: Vec<String>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _| {
            origin.to_str().map(|o| origin_allowed(o, &allowed)).unwrap_or(false)
        }))
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/search", get(handlers::search))
        .route("/health", get(handlers::health))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit::rate_limit));

    Router::new()
        .route("/", get(handlers::root))
        .nest("/api", api)
        .fallback(handlers::not_found)
        .layer(cors_layer(state.config.server.allowed_origins.clone()))
        .with_state(state)
}

pub async fn serve(state: Arc<AppState>) -> Result<()> {
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    serve_on(listener, state).await
}

pub async fn serve_on(listener: TcpListener, state: Arc<AppState>) -> Result<()> {
    let local = listener.local_addr()?;
    info!("Parts finder listening on http://{}", local);
    info!("Search example: http://{}{}", local, error::SEARCH_EXAMPLE);

    let app = router(state);
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}
