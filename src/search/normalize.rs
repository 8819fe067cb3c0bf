use anyhow::Result;
use std::collections::{HashMap, HashSet};
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::models::{PartRecord, Supplier};
use crate::parsers::parse_price;
use crate::utils::links::resolve_link;

/// Fills derivable fields and drops duplicates, keeping first-seen order.
/// Running it twice gives the same result as running it once.
#[derive(Debug, Clone)]
pub struct Normalizer {
    origins: HashMap<Supplier, Url>,
}

impl Normalizer {
    pub fn new(origins: HashMap<Supplier, Url>) -> Self {
        Self { origins }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let origins = Supplier::ALL
            .iter()
            .map(|supplier| Ok((*supplier, config.supplier_origin(*supplier)?)))
            .collect::<Result<HashMap<_, _>>>()?;
        Ok(Self::new(origins))
    }

    pub fn normalize(&self, records: Vec<PartRecord>) -> Vec<PartRecord> {
        let mut seen = HashSet::new();
        let total = records.len();

        let normalized: Vec<PartRecord> = records
            .into_iter()
            .map(|record| self.complete(record))
            .filter(|record| seen.insert(record.dedup_key()))
            .collect();

        if normalized.len() < total {
            debug!("Dropped {} duplicate records", total - normalized.len());
        }
        normalized
    }

    fn complete(&self, record: PartRecord) -> PartRecord {
        let record = match record.price() {
            Some(_) => record,
            None => {
                let price = parse_price(record.price_text());
                record.with_price(price)
            }
        };

        let relative = record
            .product_url()
            .filter(|href| Url::parse(href).is_err())
            .map(str::to_string);

        match (relative, self.origins.get(&record.supplier())) {
            (Some(href), Some(origin)) => {
                let resolved = resolve_link(origin, &href);
                record.with_product_url(resolved)
            }
            _ => record,
        }
    }
}
