use anyhow::Result;
use reqwest::Client;
use std::sync::Arc;
use tracing::{info, warn};

use super::fallback::{self, FALLBACK_ID};
use super::normalize::Normalizer;
use crate::config::Config;
use crate::models::PartRecord;
use crate::renderer::BrowserLauncher;
use crate::scrapers::{build_cascade, RetrievalRequest, RetrievalStrategy};
use crate::utils::rng::SharedRng;

/// Terminal state of one search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub records: Vec<PartRecord>,
    /// Id of the strategy that produced `records`.
    pub strategy: String,
    pub synthetic: bool,
}

/// Runs strategies strictly in order; the first one with a non-empty
/// normalized result wins and the rest are never invoked.
pub struct Orchestrator {
    strategies: Vec<Box<dyn RetrievalStrategy>>,
    normalizer: Normalizer,
    rng: SharedRng,
}

impl Orchestrator {
    pub fn new(strategies: Vec<Box<dyn RetrievalStrategy>>, normalizer: Normalizer, rng: SharedRng) -> Self {
        Self {
            strategies,
            normalizer,
            rng,
        }
    }

    pub fn from_config(config: &Config, client: Client, launcher: Arc<dyn BrowserLauncher>) -> Result<Self> {
        Ok(Self::new(
            build_cascade(config, client, launcher)?,
            Normalizer::from_config(config)?,
            SharedRng::from_entropy(),
        ))
    }

    pub fn strategy_ids(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.id()).collect()
    }

    /// Live cascade followed by the placeholder fallback. Never empty.
    pub async fn search(&self, query: &str, max_results: usize) -> SearchOutcome {
        match self.search_live(query, max_results).await {
            Some(outcome) => outcome,
            None => self.fallback(query),
        }
    }

    /// Live cascade only; `None` when every strategy came back empty.
    pub async fn search_live(&self, query: &str, max_results: usize) -> Option<SearchOutcome> {
        let request = RetrievalRequest {
            query,
            max_results,
            rng: &self.rng,
        };

        for strategy in &self.strategies {
            let records = strategy.retrieve(&request).await;
            let mut records = self.normalizer.normalize(records);
            records.truncate(max_results);

            if !records.is_empty() {
                info!(
                    "{} returned {} results for \"{}\"",
                    strategy.id(),
                    records.len(),
                    query
                );
                return Some(SearchOutcome {
                    records,
                    strategy: strategy.id().to_string(),
                    synthetic: false,
                });
            }
        }

        None
    }

    pub fn fallback(&self, query: &str) -> SearchOutcome {
        warn!("All methods failed, using sample data for \"{}\"", query);
        let records = self.rng.with(|rng| fallback::generate(query, rng));
        SearchOutcome {
            records: self.normalizer.normalize(records),
            strategy: FALLBACK_ID.to_string(),
            synthetic: true,
        }
    }
}
