use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use super::Supplier;
use crate::parsers::parse_availability;

/// Longest name kept on a record, in characters.
pub const NAME_MAX_CHARS: usize = 200;

/// Availability assumed when a listing does not state one.
pub const DEFAULT_AVAILABILITY: &str = "Available";

// NewType pattern for type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey(pub String);

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mutable staging area for a record. Turning it into a [`PartRecord`] is the
/// only way to build one, so the emission invariants live here.
#[derive(Debug, Clone)]
pub struct PartDraft {
    pub part_number: String,
    pub name: String,
    pub price: Option<f64>,
    pub price_text: String,
    pub availability: String,
    pub supplier: Supplier,
    pub product_url: Option<String>,
    pub source: String,
}

impl PartDraft {
    pub fn new(supplier: Supplier, source: impl Into<String>) -> Self {
        Self {
            part_number: String::new(),
            name: String::new(),
            price: None,
            price_text: String::new(),
            availability: String::new(),
            supplier,
            product_url: None,
            source: source.into(),
        }
    }

    /// Builds a live record, or `None` when part number or name is blank.
    pub fn into_live(self) -> Option<PartRecord> {
        if self.part_number.trim().is_empty() || self.name.trim().is_empty() {
            return None;
        }
        Some(self.build(None))
    }

    /// Builds a placeholder record carrying `note`.
    pub fn into_synthetic(self, note: impl Into<String>) -> PartRecord {
        debug_assert!(!self.part_number.trim().is_empty());
        debug_assert!(!self.name.trim().is_empty());
        self.build(Some(note.into()))
    }

    fn build(self, note: Option<String>) -> PartRecord {
        let availability = match self.availability.trim() {
            "" => DEFAULT_AVAILABILITY.to_string(),
            text => text.to_string(),
        };
        let in_stock = parse_availability(&availability);

        PartRecord {
            part_number: self.part_number.trim().to_string(),
            name: truncate_chars(self.name.trim(), NAME_MAX_CHARS),
            price: self.price,
            price_text: self.price_text,
            availability,
            in_stock,
            supplier: self.supplier,
            product_url: self.product_url,
            last_updated: Utc::now(),
            source: self.source,
            note,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartRecord {
    part_number: String,
    name: String,
    price: Option<f64>,
    price_text: String,
    availability: String,
    in_stock: bool,
    supplier: Supplier,
    product_url: Option<String>,
    last_updated: DateTime<Utc>,
    source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

impl PartRecord {
    pub fn part_number(&self) -> &str {
        &self.part_number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Option<f64> {
        self.price
    }

    pub fn price_text(&self) -> &str {
        &self.price_text
    }

    pub fn availability(&self) -> &str {
        &self.availability
    }

    pub fn in_stock(&self) -> bool {
        self.in_stock
    }

    pub fn supplier(&self) -> Supplier {
        self.supplier
    }

    pub fn product_url(&self) -> Option<&str> {
        self.product_url.as_deref()
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn is_synthetic(&self) -> bool {
        self.note.is_some()
    }

    /// Identity used for deduplication within one response.
    pub fn dedup_key(&self) -> RecordKey {
        RecordKey(
            format!(
                "{}{}{}",
                self.supplier.display_name(),
                self.part_number,
                self.name
            )
            .to_lowercase(),
        )
    }

    pub(crate) fn with_price(mut self, price: Option<f64>) -> Self {
        self.price = price;
        self
    }

    pub(crate) fn with_product_url(mut self, url: Option<String>) -> Self {
        self.product_url = url;
        self
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
