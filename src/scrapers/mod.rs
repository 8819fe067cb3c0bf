use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::config::{Config, SupplierConfig};
use crate::error::StrategyError;
use crate::extract::{DocumentParser, LocatorSpec, RecordAssembler};
use crate::models::{PartRecord, Supplier};
use crate::renderer::BrowserLauncher;
use crate::utils::http::build_search_url;
use crate::utils::retry::{DiagnosticSink, FileDiagnosticSink};
use crate::utils::rng::SharedRng;

mod fastenal;
mod grainger;
mod mcmaster;
mod rendered;
mod static_fetch;

pub use rendered::RenderedFetcher;
pub use static_fetch::StaticFetcher;

/// One query as seen by a strategy.
#[derive(Debug, Clone, Copy)]
pub struct RetrievalRequest<'a> {
    pub query: &'a str,
    pub max_results: usize,
    /// Drives fingerprint choice and human-timing delays.
    pub rng: &'a SharedRng,
}

/// One supplier/technique combination. Failures are logged and reported as
/// an empty result; they never escape.
#[async_trait]
pub trait RetrievalStrategy: Send + Sync {
    fn id(&self) -> &str;
    fn supplier(&self) -> Supplier;
    async fn retrieve(&self, request: &RetrievalRequest<'_>) -> Vec<PartRecord>;
}

/// Produces the raw markup for a search URL.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str, rng: &SharedRng) -> Result<String, StrategyError>;
}

/// A catalog search page fetched by some [`PageFetcher`] and parsed with the
/// supplier's locator table.
pub struct CatalogStrategy {
    id: String,
    supplier: Supplier,
    site: SupplierConfig,
    parser: DocumentParser,
    fetcher: Box<dyn PageFetcher>,
    attempts: u32,
    attempt_pause: Duration,
}

impl CatalogStrategy {
    pub fn new(
        id: &str,
        supplier: Supplier,
        config: &Config,
        locators: &LocatorSpec,
        fetcher: Box<dyn PageFetcher>,
    ) -> Result<Self> {
        let site = config.supplier(supplier)?.clone();
        let assembler = RecordAssembler::new(locators, supplier, config.supplier_origin(supplier)?, id)
            .with_context(|| format!("Invalid locator table for {id}"))?;
        let parser = DocumentParser::from_spec(locators, assembler, config.search.layout_policy)
            .with_context(|| format!("Invalid container locators for {id}"))?;

        Ok(Self {
            id: id.to_string(),
            supplier,
            attempts: site.attempts.max(1),
            site,
            parser,
            fetcher,
            attempt_pause: config.fetch.attempt_pause(),
        })
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    pub fn parser(&self) -> &DocumentParser {
        &self.parser
    }
}

#[async_trait]
impl RetrievalStrategy for CatalogStrategy {
    fn id(&self) -> &str {
        &self.id
    }

    fn supplier(&self) -> Supplier {
        self.supplier
    }

    async fn retrieve(&self, request: &RetrievalRequest<'_>) -> Vec<PartRecord> {
        let url = match build_search_url(&self.site, request.query) {
            Ok(url) => url,
            Err(e) => {
                error!("{} cannot build a search URL: {}", self.id, e);
                return Vec::new();
            }
        };

        info!("Trying {} for: \"{}\"", self.site.name, request.query);

        for attempt in 1..=self.attempts {
            if self.attempts > 1 {
                info!("{} attempt {}/{}", self.id, attempt, self.attempts);
            }

            match self.fetcher.fetch(&url, request.rng).await {
                Ok(html) => {
                    let records = self.parser.parse(&html, request.max_results);
                    if !records.is_empty() {
                        return records;
                    }
                    info!("{} page had no recognizable products", self.id);
                }
                Err(e) => warn!("{} failed: {}", self.id, e),
            }

            if attempt < self.attempts {
                sleep(self.attempt_pause).await;
            }
        }

        Vec::new()
    }
}

/// All strategies in priority order: Grainger static, Grainger rendered
/// (when enabled), McMaster-Carr, Fastenal.
pub fn build_cascade(
    config: &Config,
    client: Client,
    launcher: Arc<dyn BrowserLauncher>,
) -> Result<Vec<Box<dyn RetrievalStrategy>>> {
    let mut strategies: Vec<Box<dyn RetrievalStrategy>> =
        vec![Box::new(grainger::static_strategy(config, client.clone())?)];

    if config.render.enabled {
        let diagnostics = config
            .render
            .diagnostics_dir
            .as_ref()
            .map(|dir| Arc::new(FileDiagnosticSink::new(dir)) as Arc<dyn DiagnosticSink>);
        strategies.push(Box::new(grainger::rendered_strategy(config, launcher, diagnostics)?));
    }

    strategies.push(Box::new(mcmaster::strategy(config, client.clone())?));
    strategies.push(Box::new(fastenal::strategy(config, client)?));

    Ok(strategies)
}

/// Static-fetch strategy for one supplier, used by the diagnostic tool.
pub fn static_strategy_for(supplier: Supplier, config: &Config, client: Client) -> Result<CatalogStrategy> {
    match supplier {
        Supplier::Grainger => grainger::static_strategy(config, client),
        Supplier::McMasterCarr => mcmaster::strategy(config, client),
        Supplier::Fastenal => fastenal::strategy(config, client),
    }
}
