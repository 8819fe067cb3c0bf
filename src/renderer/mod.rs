//! Browser abstraction for the rendered-page strategy.
//!
//! A [`BrowserLauncher`] starts one browser per attempt and hands back a
//! [`BrowserSession`]. Sessions are only ever used through a [`ScopedSession`],
//! which has a single release point covering success and error alike.

pub mod chromium;

use async_trait::async_trait;
use std::time::Duration;
use tracing::warn;

use crate::error::StrategyError;
use crate::utils::fingerprint::Fingerprint;

#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    /// Start a browser with a fresh, isolated page presenting `fingerprint`.
    async fn launch(&self, fingerprint: &Fingerprint) -> Result<Box<dyn BrowserSession>, StrategyError>;
}

#[async_trait]
pub trait BrowserSession: Send {
    /// Navigate the page, bounded by the session's navigation timeout.
    async fn open(&mut self, url: &str) -> Result<(), StrategyError>;

    /// Whether a node matching `selector` appears within `timeout`.
    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<bool, StrategyError>;

    /// Current page markup.
    async fn content(&mut self) -> Result<String, StrategyError>;

    /// Shut down the page and the browser process.
    async fn close(self: Box<Self>) -> Result<(), StrategyError>;
}

/// Owns a launched session until [`ScopedSession::release`].
///
/// ```ignore
/// let mut scope = ScopedSession::acquire(launcher, fingerprint).await?;
/// let outcome = drive(scope.session()).await;
/// scope.release(outcome).await
/// ```
pub struct ScopedSession {
    session: Option<Box<dyn BrowserSession>>,
}

impl ScopedSession {
    pub async fn acquire(
        launcher: &dyn BrowserLauncher,
        fingerprint: &Fingerprint,
    ) -> Result<Self, StrategyError> {
        let session = launcher.launch(fingerprint).await?;
        Ok(Self {
            session: Some(session),
        })
    }

    pub fn session(&mut self) -> Result<&mut dyn BrowserSession, StrategyError> {
        match self.session.as_mut() {
            Some(session) => Ok(session.as_mut()),
            None => Err(StrategyError::Browser("session already released".to_string())),
        }
    }

    /// Close the browser, then hand back `outcome` untouched.
    pub async fn release<T>(mut self, outcome: T) -> T {
        if let Some(session) = self.session.take() {
            if let Err(e) = session.close().await {
                warn!("Failed to close browser cleanly: {}", e);
            }
        }
        outcome
    }
}

impl Drop for ScopedSession {
    fn drop(&mut self) {
        // Only reached on panic or cancellation; the session's own Drop
        // tears the process down.
        if self.session.is_some() {
            warn!("Browser session dropped without release");
        }
    }
}
