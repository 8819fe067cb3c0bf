use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::PageFetcher;
use crate::config::Config;
use crate::error::StrategyError;
use crate::renderer::{BrowserLauncher, ScopedSession};
use crate::utils::fingerprint::{Fingerprint, FingerprintRotation};
use crate::utils::retry::{DiagnosticSink, RetryPolicy};
use crate::utils::rng::SharedRng;

/// Loads the search page in a headless browser and waits for a product
/// container to appear before taking the markup.
pub struct RenderedFetcher {
    label: String,
    launcher: Arc<dyn BrowserLauncher>,
    rotation: FingerprintRotation,
    retry: RetryPolicy,
    wait_selectors: Vec<String>,
    wait_per_selector: Duration,
    diagnostics: Option<Arc<dyn DiagnosticSink>>,
}

impl RenderedFetcher {
    pub fn new(
        label: &str,
        config: &Config,
        launcher: Arc<dyn BrowserLauncher>,
        wait_selectors: &[&str],
        diagnostics: Option<Arc<dyn DiagnosticSink>>,
    ) -> Self {
        Self {
            label: label.to_string(),
            launcher,
            rotation: FingerprintRotation::new(config.fingerprints.clone()),
            retry: RetryPolicy::new(
                config.render.max_attempts,
                Duration::from_millis(config.render.backoff_base_ms),
            ),
            wait_selectors: wait_selectors.iter().map(|s| s.to_string()).collect(),
            wait_per_selector: Duration::from_millis(config.render.wait_per_locator_ms),
            diagnostics,
        }
    }

    async fn render_once(&self, url: &str, fingerprint: Fingerprint) -> Result<String, StrategyError> {
        let mut scope = ScopedSession::acquire(self.launcher.as_ref(), &fingerprint).await?;
        let outcome = self.drive(&mut scope, url).await;
        scope.release(outcome).await
    }

    async fn drive(&self, scope: &mut ScopedSession, url: &str) -> Result<String, StrategyError> {
        let session = scope.session()?;
        session.open(url).await?;

        for selector in &self.wait_selectors {
            if session.wait_for(selector, self.wait_per_selector).await? {
                debug!("{} found {} on rendered page", self.label, selector);
                return session.content().await;
            }
        }

        Err(StrategyError::NoContainer {
            url: url.to_string(),
            markup: session.content().await.ok(),
        })
    }
}

#[async_trait]
impl PageFetcher for RenderedFetcher {
    async fn fetch(&self, url: &str, rng: &SharedRng) -> Result<String, StrategyError> {
        self.retry
            .run(&self.label, self.diagnostics.as_deref(), |_| {
                let fingerprint = rng.with(|r| self.rotation.select(r).clone());
                self.render_once(url, fingerprint)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::BrowserSession;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Counters {
        launches: AtomicU32,
        closes: AtomicU32,
        agents: Mutex<Vec<String>>,
    }

    struct FakeLauncher {
        counters: Arc<Counters>,
        markup: Option<&'static str>,
        fail_navigation: bool,
        installed: bool,
    }

    struct FakeSession {
        counters: Arc<Counters>,
        markup: Option<&'static str>,
        fail_navigation: bool,
    }

    #[async_trait]
    impl BrowserLauncher for FakeLauncher {
        async fn launch(&self, fingerprint: &Fingerprint) -> Result<Box<dyn BrowserSession>, StrategyError> {
            if !self.installed {
                return Err(StrategyError::BrowserUnavailable("no chromium".to_string()));
            }
            self.counters.launches.fetch_add(1, Ordering::SeqCst);
            self.counters.agents.lock().unwrap().push(fingerprint.user_agent.clone());
            Ok(Box::new(FakeSession {
                counters: self.counters.clone(),
                markup: self.markup,
                fail_navigation: self.fail_navigation,
            }))
        }
    }

    #[async_trait]
    impl BrowserSession for FakeSession {
        async fn open(&mut self, url: &str) -> Result<(), StrategyError> {
            if self.fail_navigation {
                return Err(StrategyError::Navigation {
                    url: url.to_string(),
                    reason: "net::ERR_TIMED_OUT".to_string(),
                });
            }
            Ok(())
        }

        async fn wait_for(&mut self, selector: &str, _timeout: Duration) -> Result<bool, StrategyError> {
            Ok(self.markup.map_or(false, |m| m.contains(selector.trim_start_matches('.'))))
        }

        async fn content(&mut self) -> Result<String, StrategyError> {
            Ok(self.markup.unwrap_or("<html><body>Access Denied</body></html>").to_string())
        }

        async fn close(self: Box<Self>) -> Result<(), StrategyError> {
            self.counters.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn fetcher(launcher: FakeLauncher) -> RenderedFetcher {
        let mut config = Config::default();
        config.render.backoff_base_ms = 10;
        RenderedFetcher::new(
            "grainger-rendered",
            &config,
            Arc::new(launcher),
            &[".product-tile", ".search-result"],
            None,
        )
    }

    fn launcher(counters: &Arc<Counters>, markup: Option<&'static str>, fail_navigation: bool) -> FakeLauncher {
        FakeLauncher {
            counters: counters.clone(),
            markup,
            fail_navigation,
            installed: true,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn returns_markup_once_a_container_appears() {
        let counters = Arc::new(Counters::default());
        let fetcher = fetcher(launcher(&counters, Some("<div class=\"search-result\">6203</div>"), false));

        let html = fetcher.fetch("https://www.grainger.com/search", &SharedRng::seeded(9)).await.unwrap();
        assert!(html.contains("6203"));
        assert_eq!(counters.launches.load(Ordering::SeqCst), 1);
        assert_eq!(counters.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn every_failed_attempt_still_closes_the_browser() {
        let counters = Arc::new(Counters::default());
        let fetcher = fetcher(launcher(&counters, None, true));

        let result = fetcher.fetch("https://www.grainger.com/search", &SharedRng::seeded(9)).await;
        assert!(matches!(result, Err(StrategyError::Navigation { .. })));
        assert_eq!(counters.launches.load(Ordering::SeqCst), 3);
        assert_eq!(counters.closes.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_containers_keep_the_page_for_diagnostics() {
        let counters = Arc::new(Counters::default());
        let fetcher = fetcher(launcher(&counters, None, false));

        match fetcher.fetch("https://www.grainger.com/search", &SharedRng::seeded(9)).await {
            Err(StrategyError::NoContainer { markup, .. }) => {
                assert_eq!(markup.as_deref(), Some("<html><body>Access Denied</body></html>"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(counters.closes.load(Ordering::SeqCst), 3);
        assert_eq!(counters.agents.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn missing_browser_is_not_retried() {
        let counters = Arc::new(Counters::default());
        let mut fake = launcher(&counters, None, false);
        fake.installed = false;
        let fetcher = fetcher(fake);

        let result = fetcher.fetch("https://www.grainger.com/search", &SharedRng::seeded(9)).await;
        assert!(matches!(result, Err(StrategyError::BrowserUnavailable(_))));
        assert_eq!(counters.launches.load(Ordering::SeqCst), 0);
    }
}
