use chrono::Utc;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::StrategyError;

/// Receives every failed attempt. Used to keep a copy of what the page
/// looked like when extraction failed.
pub trait DiagnosticSink: Send + Sync {
    fn capture(&self, label: &str, attempt: u32, error: &StrategyError);
}

/// Writes the failing page (or the error, when no markup was captured) into
/// a directory.
#[derive(Debug, Clone)]
pub struct FileDiagnosticSink {
    dir: PathBuf,
}

impl FileDiagnosticSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DiagnosticSink for FileDiagnosticSink {
    fn capture(&self, label: &str, attempt: u32, error: &StrategyError) {
        let stamp = Utc::now().format("%Y%m%dT%H%M%S");
        let (extension, contents) = match error.markup() {
            Some(markup) => ("html", markup.to_string()),
            None => ("txt", error.to_string()),
        };
        let path = self
            .dir
            .join(format!("{label}-{stamp}-attempt{attempt}.{extension}"));
        let dir = self.dir.clone();

        // keep file I/O off the async workers when a runtime is around
        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || write_dump(&dir, &path, &contents));
            }
            Err(_) => write_dump(&dir, &path, &contents),
        }
    }
}

fn write_dump(dir: &Path, path: &Path, contents: &str) {
    let written = std::fs::create_dir_all(dir).and_then(|_| std::fs::write(path, contents));
    match written {
        Ok(()) => info!("Saved diagnostic dump to {}", path.display()),
        Err(e) => warn!("Could not write diagnostic dump {}: {}", path.display(), e),
    }
}

/// Bounded retries with exponential backoff: after the n-th failure (0-based)
/// the policy waits `base_delay * 2^n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn backoff(&self, failed_attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(failed_attempt))
    }

    /// Runs `op` until it succeeds, fails with a non-retryable error, or the
    /// attempts run out. `op` receives the 0-based attempt number.
    pub async fn run<T, F, Fut>(
        &self,
        label: &str,
        diagnostics: Option<&dyn DiagnosticSink>,
        mut op: F,
    ) -> Result<T, StrategyError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, StrategyError>>,
    {
        let mut attempt = 0;
        loop {
            let err = match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            warn!(
                "{} attempt {}/{} failed: {}",
                label,
                attempt + 1,
                self.max_attempts,
                err
            );
            if let Some(sink) = diagnostics {
                sink.capture(label, attempt + 1, &err);
            }

            if attempt + 1 >= self.max_attempts || !err.is_retryable() {
                return Err(err);
            }

            let delay = self.backoff(attempt);
            warn!("Retrying {} in {:?}", label, delay);
            sleep(delay).await;
            attempt += 1;
        }
    }
}
