use anyhow::Result;
use reqwest::Client;

use super::{CatalogStrategy, StaticFetcher};
use crate::config::Config;
use crate::extract::LocatorSpec;
use crate::models::Supplier;

pub const ID: &str = "fastenal";

pub const LOCATORS: LocatorSpec = LocatorSpec {
    containers: &[".product-item", ".search-result", ".product"],
    part_number: &[".part-number", ".product-number"],
    name: &[".product-name", ".description"],
    price: &[".price"],
    availability: &[".availability", ".stock-status"],
    min_part_number_chars: 1,
    min_name_chars: 1,
};

pub fn strategy(config: &Config, client: Client) -> Result<CatalogStrategy> {
    let site = config.supplier(Supplier::Fastenal)?;
    let fetcher = StaticFetcher::for_supplier(config, site, client);
    CatalogStrategy::new(ID, Supplier::Fastenal, config, &LOCATORS, Box::new(fetcher))
}
