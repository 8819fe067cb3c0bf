use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use super::error::{ApiError, SEARCH_EXAMPLE};
use super::AppState;
use crate::models::PartRecord;
use crate::parsers::sanitize_query;
use crate::search::{Orchestrator, SearchOutcome};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    q: Option<String>,
    limit: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<PartRecord>,
    pub query: String,
    pub result_count: usize,
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub strategy: String,
    pub synthetic: bool,
    pub methods: Vec<String>,
}

impl SearchResponse {
    fn new(query: &str, outcome: SearchOutcome, methods: Vec<String>) -> Self {
        let source = outcome
            .records
            .first()
            .map(|r| r.supplier().display_name().to_string())
            .unwrap_or_else(|| "Multiple".to_string());

        Self {
            result_count: outcome.records.len(),
            results: outcome.records,
            query: query.to_string(),
            timestamp: Utc::now(),
            source,
            strategy: outcome.strategy,
            synthetic: outcome.synthetic,
            methods,
        }
    }
}

/// Missing or non-numeric limits use the default; the rest are clamped.
pub fn resolve_limit(raw: Option<&str>, default: usize, cap: usize) -> usize {
    let cap = cap.max(1);
    match raw.and_then(|l| l.trim().parse::<i64>().ok()) {
        Some(limit) => limit.clamp(1, cap as i64) as usize,
        None => default.clamp(1, cap),
    }
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Query(params) = params.map_err(|rejection| ApiError::InvalidQuery(rejection.body_text()))?;
    let settings = &state.config.search;
    let query = params.q.as_deref().map(str::trim).unwrap_or_default().to_string();

    if query.chars().count() < settings.min_query_chars {
        return Err(ApiError::QueryTooShort {
            min: settings.min_query_chars,
        });
    }

    let limit = resolve_limit(
        params.limit.as_deref(),
        settings.default_max_results,
        settings.max_results_cap,
    );
    info!("Search request: \"{}\" (limit {})", query, limit);

    let orchestrator = state.orchestrator.clone();
    let retry_sanitized = settings.retry_sanitized_query;
    let task_query = query.clone();

    // a panic anywhere in the cascade surfaces as a JoinError
    let outcome = tokio::spawn(async move { run_search(&orchestrator, &task_query, limit, retry_sanitized).await })
        .await
        .map_err(|e| ApiError::SearchFailed {
            query: query.clone(),
            message: e.to_string(),
        })?;

    Ok(Json(SearchResponse::new(&query, outcome, state.methods())))
}

/// Live cascade, then once more with the sanitized query when it differs,
/// then placeholders for the original query.
pub async fn run_search(orchestrator: &Orchestrator, query: &str, limit: usize, retry_sanitized: bool) -> SearchOutcome {
    if let Some(outcome) = orchestrator.search_live(query, limit).await {
        return outcome;
    }

    if retry_sanitized {
        let sanitized = sanitize_query(query);
        if !sanitized.is_empty() && sanitized != query {
            info!("Retrying with sanitized query \"{}\"", sanitized);
            if let Some(outcome) = orchestrator.search_live(&sanitized, limit).await {
                return outcome;
            }
        }
    }

    orchestrator.fallback(query)
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "OK",
        "timestamp": Utc::now(),
        "uptime": state.started.elapsed().as_secs_f64(),
        "version": env!("CARGO_PKG_VERSION"),
        "features": state.features(),
    }))
}

pub async fn root(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "message": "Parts Finder API - multi-supplier industrial part search",
        "version": env!("CARGO_PKG_VERSION"),
        "methods": state.methods(),
        "endpoints": {
            "search": "/api/search?q=YOUR_QUERY",
            "health": "/api/health",
        },
        "example": SEARCH_EXAMPLE,
    }))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
