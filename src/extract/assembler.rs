use scraper::{ElementRef, Selector};
use url::Url;

use super::field::extract_field;
use super::locator::{css_chain, currency_first_chain, LocatorChain};
use crate::error::LocatorError;
use crate::models::{PartDraft, PartRecord, Supplier};
use crate::parsers::{parse_price, sanitize_part_number};
use crate::utils::links::resolve_link;

/// A supplier's selector table, most specific selector first in each list.
#[derive(Debug, Clone, Copy)]
pub struct LocatorSpec {
    pub containers: &'static [&'static str],
    pub part_number: &'static [&'static str],
    pub name: &'static [&'static str],
    pub price: &'static [&'static str],
    pub availability: &'static [&'static str],
    /// Shortest sanitized part number accepted.
    pub min_part_number_chars: usize,
    /// Shortest name accepted.
    pub min_name_chars: usize,
}

/// Field locators built from a [`LocatorSpec`].
#[derive(Debug)]
pub struct FieldLocators {
    pub part_number: LocatorChain,
    pub name: LocatorChain,
    pub price: LocatorChain,
    pub availability: LocatorChain,
}

impl FieldLocators {
    pub fn from_spec(spec: &LocatorSpec) -> Result<Self, LocatorError> {
        Ok(Self {
            part_number: css_chain(spec.part_number)?,
            name: css_chain(spec.name)?,
            price: currency_first_chain(spec.price)?,
            availability: css_chain(spec.availability)?,
        })
    }
}

/// Turns one product node into a [`PartRecord`], or rejects it.
#[derive(Debug)]
pub struct RecordAssembler {
    fields: FieldLocators,
    supplier: Supplier,
    base_url: Url,
    source: String,
    min_part_number_chars: usize,
    min_name_chars: usize,
    anchor: Selector,
}

impl RecordAssembler {
    pub fn new(
        spec: &LocatorSpec,
        supplier: Supplier,
        base_url: Url,
        source: impl Into<String>,
    ) -> Result<Self, LocatorError> {
        let anchor = Selector::parse("a[href]").map_err(|e| LocatorError {
            selector: "a[href]".to_string(),
            reason: format!("{e:?}"),
        })?;

        Ok(Self {
            fields: FieldLocators::from_spec(spec)?,
            supplier,
            base_url,
            source: source.into(),
            min_part_number_chars: spec.min_part_number_chars.max(1),
            min_name_chars: spec.min_name_chars.max(1),
            anchor,
        })
    }

    /// `None` means the node is not a usable listing; that is a filter, not
    /// an error.
    pub fn assemble(&self, node: ElementRef<'_>) -> Option<PartRecord> {
        let part_number = sanitize_part_number(&extract_field(node, &self.fields.part_number));
        let name = extract_field(node, &self.fields.name);

        if part_number.chars().count() < self.min_part_number_chars
            || name.chars().count() < self.min_name_chars
        {
            return None;
        }

        let price_text = extract_field(node, &self.fields.price);
        let availability = extract_field(node, &self.fields.availability);

        let mut draft = PartDraft::new(self.supplier, self.source.clone());
        draft.part_number = part_number;
        draft.name = name;
        draft.price = parse_price(&price_text);
        draft.price_text = price_text;
        draft.availability = availability;
        draft.product_url = self
            .first_href(node)
            .and_then(|href| resolve_link(&self.base_url, href));

        draft.into_live()
    }

    fn first_href<'a>(&self, node: ElementRef<'a>) -> Option<&'a str> {
        if node.value().name() == "a" {
            if let Some(href) = node.value().attr("href") {
                return Some(href);
            }
        }
        node.select(&self.anchor)
            .next()
            .and_then(|a| a.value().attr("href"))
    }
}
