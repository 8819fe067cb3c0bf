use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

use super::PageFetcher;
use crate::config::{Config, SupplierConfig};
use crate::error::StrategyError;
use crate::utils::fingerprint::FingerprintRotation;
use crate::utils::http::fetch_page;
use crate::utils::rng::{HumanDelay, SharedRng};

/// Plain HTTP GET with a rotated header fingerprint.
pub struct StaticFetcher {
    client: Client,
    rotation: FingerprintRotation,
    delay: Option<HumanDelay>,
    timeout: Duration,
}

impl StaticFetcher {
    pub fn new(client: Client, rotation: FingerprintRotation, delay: Option<HumanDelay>, timeout: Duration) -> Self {
        Self {
            client,
            rotation,
            delay,
            timeout,
        }
    }

    pub fn for_supplier(config: &Config, site: &SupplierConfig, client: Client) -> Self {
        let delay = site
            .human_delay
            .then(|| HumanDelay::from_millis(config.fetch.human_delay_min_ms, config.fetch.human_delay_max_ms));

        Self::new(
            client,
            FingerprintRotation::new(config.fingerprints.clone()),
            delay,
            site.timeout(),
        )
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str, rng: &SharedRng) -> Result<String, StrategyError> {
        let (fingerprint, pause) = rng.with(|r| {
            let fingerprint = self.rotation.select(r).clone();
            let pause = self.delay.map(|delay| delay.sample(r));
            (fingerprint, pause)
        });

        if let Some(pause) = pause {
            debug!("Waiting {:?} before request", pause);
            sleep(pause).await;
        }

        fetch_page(&self.client, url, &fingerprint, self.timeout).await
    }
}
