use std::time::Duration;
use thiserror::Error;

/// A locator table entry that does not parse as CSS.
#[derive(Debug, Error)]
#[error("invalid selector `{selector}`: {reason}")]
pub struct LocatorError {
    pub selector: String,
    pub reason: String,
}

/// Why a single strategy attempt produced no document. Always recovered
/// inside the strategy; never surfaced to callers of the orchestrator.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("HTTP error {status} from {url}")]
    Status { status: u16, url: String },

    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid search URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("no browser binary available: {0}")]
    BrowserUnavailable(String),

    #[error("browser error: {0}")]
    Browser(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("no product container appeared on {url}")]
    NoContainer { url: String, markup: Option<String> },
}

impl StrategyError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            StrategyError::BrowserUnavailable(_) | StrategyError::InvalidUrl { .. }
        )
    }

    /// Page markup captured at the moment of failure, if any.
    pub fn markup(&self) -> Option<&str> {
        match self {
            StrategyError::NoContainer { markup, .. } => markup.as_deref(),
            _ => None,
        }
    }
}
