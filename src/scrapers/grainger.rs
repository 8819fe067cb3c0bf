use anyhow::Result;
use reqwest::Client;
use std::sync::Arc;

use super::{CatalogStrategy, RenderedFetcher, StaticFetcher};
use crate::config::Config;
use crate::extract::LocatorSpec;
use crate::models::Supplier;
use crate::renderer::BrowserLauncher;
use crate::utils::retry::DiagnosticSink;

pub const STATIC_ID: &str = "grainger-static";
pub const RENDERED_ID: &str = "grainger-rendered";

pub const LOCATORS: LocatorSpec = LocatorSpec {
    containers: &[
        "[data-automation-id=\"product-tile\"]",
        ".search-result",
        ".product-item",
        ".product-card",
        ".ProductTileContainer",
        ".product-listing-item",
    ],
    part_number: &[
        "[data-automation-id=\"product-item-number\"]",
        ".product-number",
        ".item-number",
        ".part-number",
        "[class*=\"item-number\"]",
    ],
    name: &[
        "[data-automation-id=\"product-title\"]",
        ".product-title",
        ".product-name",
        "h3",
        "h4",
        "[class*=\"title\"]",
    ],
    price: &[
        "[data-automation-id=\"product-price\"]",
        ".price",
        ".product-price",
        "[class*=\"price\"]",
    ],
    availability: &[
        "[data-automation-id=\"product-availability\"]",
        ".availability",
        ".stock-status",
    ],
    min_part_number_chars: 3,
    min_name_chars: 6,
};

pub fn static_strategy(config: &Config, client: Client) -> Result<CatalogStrategy> {
    let site = config.supplier(Supplier::Grainger)?;
    let fetcher = StaticFetcher::for_supplier(config, site, client);
    CatalogStrategy::new(STATIC_ID, Supplier::Grainger, config, &LOCATORS, Box::new(fetcher))
}

/// Retries live inside the fetcher, so the strategy itself makes one attempt.
pub fn rendered_strategy(
    config: &Config,
    launcher: Arc<dyn BrowserLauncher>,
    diagnostics: Option<Arc<dyn DiagnosticSink>>,
) -> Result<CatalogStrategy> {
    let fetcher = RenderedFetcher::new(RENDERED_ID, config, launcher, LOCATORS.containers, diagnostics);
    Ok(
        CatalogStrategy::new(RENDERED_ID, Supplier::Grainger, config, &LOCATORS, Box::new(fetcher))?
            .with_attempts(1),
    )
}
