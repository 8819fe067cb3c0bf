//! Chromium-backed browser sessions using chromiumoxide.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{EnableParams, SetBlockedUrLsParams};
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, warn};

use super::{BrowserLauncher, BrowserSession};
use crate::config::RenderConfig;
use crate::error::StrategyError;
use crate::utils::fingerprint::Fingerprint;

/// Locate a Chrome/Chromium binary: explicit path, `CHROME_PATH`, then `PATH`.
pub fn find_chromium(configured: Option<&PathBuf>) -> Option<PathBuf> {
    if let Some(path) = configured {
        if path.exists() {
            return Some(path.clone());
        }
        warn!("Configured Chrome path {} does not exist", path.display());
    }

    if let Ok(p) = std::env::var("CHROME_PATH") {
        let path = PathBuf::from(p);
        if path.exists() {
            return Some(path);
        }
    }

    ["google-chrome", "google-chrome-stable", "chromium", "chromium-browser"]
        .iter()
        .find_map(|name| which::which(name).ok())
}

pub struct ChromiumLauncher {
    chrome_path: Option<PathBuf>,
    viewport: (u32, u32),
    navigation_timeout: Duration,
    poll_interval: Duration,
    blocked_url_patterns: Vec<String>,
}

impl ChromiumLauncher {
    pub fn new(render: &RenderConfig) -> Self {
        Self {
            chrome_path: render.chrome_path.clone(),
            viewport: (render.viewport_width, render.viewport_height),
            navigation_timeout: Duration::from_secs(render.navigation_timeout_secs),
            poll_interval: Duration::from_millis(render.poll_interval_ms.max(50)),
            blocked_url_patterns: render.blocked_url_patterns.clone(),
        }
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self, fingerprint: &Fingerprint) -> Result<Box<dyn BrowserSession>, StrategyError> {
        let chrome_path = find_chromium(self.chrome_path.as_ref()).ok_or_else(|| {
            StrategyError::BrowserUnavailable("no Chrome or Chromium binary found".to_string())
        })?;

        let config = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .viewport(Some(Viewport {
                width: self.viewport.0,
                height: self.viewport.1,
                device_scale_factor: Some(1.0),
                ..Default::default()
            }))
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--blink-settings=imagesEnabled=false")
            .build()
            .map_err(|e| StrategyError::Browser(format!("failed to build browser config: {e}")))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| StrategyError::Browser(format!("failed to launch Chromium: {e}")))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        let mut session = ChromiumSession {
            browser,
            page: None,
            handler_task,
            navigation_timeout: self.navigation_timeout,
            poll_interval: self.poll_interval,
        };

        // the browser is already running, so a failed setup still closes it
        if let Err(e) = session.prepare(fingerprint, &self.blocked_url_patterns).await {
            let _ = Box::new(session).close().await;
            return Err(e);
        }

        Ok(Box::new(session))
    }
}

pub struct ChromiumSession {
    browser: Browser,
    page: Option<Page>,
    handler_task: JoinHandle<()>,
    navigation_timeout: Duration,
    poll_interval: Duration,
}

impl ChromiumSession {
    async fn prepare(&mut self, fingerprint: &Fingerprint, blocked: &[String]) -> Result<(), StrategyError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| StrategyError::Browser(format!("failed to create page: {e}")))?;

        page.set_user_agent(fingerprint.user_agent.clone())
            .await
            .map_err(|e| StrategyError::Browser(format!("failed to set user agent: {e}")))?;

        if !blocked.is_empty() {
            page.execute(EnableParams::default())
                .await
                .map_err(|e| StrategyError::Browser(format!("failed to enable network domain: {e}")))?;
            page.execute(SetBlockedUrLsParams::new(blocked.to_vec()))
                .await
                .map_err(|e| StrategyError::Browser(format!("failed to block resources: {e}")))?;
        }

        self.page = Some(page);
        Ok(())
    }

    fn page(&self) -> Result<&Page, StrategyError> {
        self.page
            .as_ref()
            .ok_or_else(|| StrategyError::Browser("page not created".to_string()))
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn open(&mut self, url: &str) -> Result<(), StrategyError> {
        let page = self.page()?;
        match timeout(self.navigation_timeout, page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(StrategyError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Err(StrategyError::Navigation {
                url: url.to_string(),
                reason: format!("timed out after {:?}", self.navigation_timeout),
            }),
        }
    }

    async fn wait_for(&mut self, selector: &str, wait: Duration) -> Result<bool, StrategyError> {
        let page = self.page()?;
        let deadline = Instant::now() + wait;

        loop {
            if page.find_element(selector).await.is_ok() {
                debug!("Selector {} appeared", selector);
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            sleep(self.poll_interval).await;
        }
    }

    async fn content(&mut self) -> Result<String, StrategyError> {
        self.page()?
            .content()
            .await
            .map_err(|e| StrategyError::Browser(format!("failed to read page content: {e}")))
    }

    async fn close(self: Box<Self>) -> Result<(), StrategyError> {
        let mut this = *self;

        if let Some(page) = this.page.take() {
            let _ = page.close().await;
        }

        let closed = this
            .browser
            .close()
            .await
            .map_err(|e| StrategyError::Browser(format!("failed to close browser: {e}")));
        let _ = this.browser.wait().await;
        this.handler_task.abort();

        closed.map(|_| ())
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}
