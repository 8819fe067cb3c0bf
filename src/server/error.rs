use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub const SEARCH_EXAMPLE: &str = "/api/search?q=6203%20bearing";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Query parameter must be at least {min} characters")]
    QueryTooShort { min: usize },

    #[error("Invalid query parameters: {0}")]
    InvalidQuery(String),

    #[error("Search failed: {message}")]
    SearchFailed { query: String, message: String },

    #[error("Too many requests, please try again later")]
    RateLimited,

    #[error("Not found")]
    NotFound,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::QueryTooShort { .. } | ApiError::InvalidQuery(_) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": self.to_string(), "example": SEARCH_EXAMPLE }),
            ),
            ApiError::SearchFailed { query, message } => {
                error!("Search API error for \"{}\": {}", query, message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "Search failed",
                        "message": message,
                        "query": query,
                        "timestamp": Utc::now(),
                    }),
                )
            }
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                json!({ "error": self.to_string() }),
            ),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                json!({ "error": self.to_string(), "endpoints": ["/api/search", "/api/health"] }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
