use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::assembler::{LocatorSpec, RecordAssembler};
use super::locator::{css_chain, LocatorChain};
use crate::error::LocatorError;
use crate::models::PartRecord;

/// What to do when a container locator matches nodes but none of them
/// assemble into a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutPolicy {
    /// Stop at the first locator that matches any node.
    CommitToFirstMatch,
    /// Move on to the next locator when the match yielded no record.
    #[default]
    FallThroughOnEmpty,
}

/// Extracts records from a whole search-results page.
#[derive(Debug)]
pub struct DocumentParser {
    containers: LocatorChain,
    assembler: RecordAssembler,
    policy: LayoutPolicy,
}

impl DocumentParser {
    pub fn new(containers: LocatorChain, assembler: RecordAssembler, policy: LayoutPolicy) -> Self {
        Self {
            containers,
            assembler,
            policy,
        }
    }

    pub fn from_spec(
        spec: &LocatorSpec,
        assembler: RecordAssembler,
        policy: LayoutPolicy,
    ) -> Result<Self, LocatorError> {
        Ok(Self::new(css_chain(spec.containers)?, assembler, policy))
    }

    /// Parses `html` and extracts at most `max_results` records.
    pub fn parse(&self, html: &str, max_results: usize) -> Vec<PartRecord> {
        let document = Html::parse_document(html);
        self.parse_document(&document, max_results)
    }

    pub fn parse_document(&self, document: &Html, max_results: usize) -> Vec<PartRecord> {
        let root = document.root_element();

        for container in &self.containers {
            let nodes = container.locate(root);
            if nodes.is_empty() {
                continue;
            }

            debug!(
                "Found {} product nodes with selector: {}",
                nodes.len(),
                container.describe()
            );

            let records: Vec<PartRecord> = nodes
                .into_iter()
                .take(max_results)
                .filter_map(|node| self.assembler.assemble(node))
                .collect();

            match self.policy {
                LayoutPolicy::CommitToFirstMatch => return records,
                LayoutPolicy::FallThroughOnEmpty if !records.is_empty() => return records,
                LayoutPolicy::FallThroughOnEmpty => {
                    debug!(
                        "Selector {} matched but yielded no records, trying next",
                        container.describe()
                    );
                }
            }
        }

        Vec::new()
    }

    /// Node count per container locator, for diagnostics.
    pub fn container_matches(&self, document: &Html) -> Vec<(String, usize)> {
        let root = document.root_element();
        self.containers
            .iter()
            .map(|c| (c.describe().to_string(), c.locate(root).len()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Supplier;
    use url::Url;

    const SPEC: LocatorSpec = LocatorSpec {
        containers: &[".product-tile", ".search-result"],
        part_number: &[".part-number"],
        name: &[".product-name"],
        price: &[".price"],
        availability: &[".availability"],
        min_part_number_chars: 1,
        min_name_chars: 1,
    };

    fn parser(policy: LayoutPolicy) -> DocumentParser {
        let assembler = RecordAssembler::new(
            &SPEC,
            Supplier::Fastenal,
            Url::parse("https://www.fastenal.com").unwrap(),
            "fastenal",
        )
        .unwrap();
        DocumentParser::from_spec(&SPEC, assembler, policy).unwrap()
    }

    fn tiles(class: &str, count: usize) -> String {
        (0..count)
            .map(|i| {
                format!(
                    r#"<div class="{class}"><span class="part-number">P-{i}</span><span class="product-name">Part {i}</span></div>"#
                )
            })
            .collect()
    }

    #[test]
    fn respects_max_results() {
        let html = format!("<html><body>{}</body></html>", tiles("product-tile", 8));
        let records = parser(LayoutPolicy::default()).parse(&html, 5);
        assert_eq!(records.len(), 5);
        assert!(records
            .iter()
            .all(|r| !r.part_number().is_empty() && !r.name().is_empty()));
        assert_eq!(records[0].part_number(), "P-0");
    }

    #[test]
    fn first_matching_locator_wins() {
        let html = format!(
            "<html><body>{}{}</body></html>",
            tiles("search-result", 2),
            tiles("product-tile", 1)
        );
        let records = parser(LayoutPolicy::default()).parse(&html, 5);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn empty_match_falls_through_by_default() {
        let html = format!(
            r#"<html><body><div class="product-tile">ad slot</div>{}</body></html>"#,
            tiles("search-result", 3)
        );
        assert_eq!(parser(LayoutPolicy::FallThroughOnEmpty).parse(&html, 5).len(), 3);
        assert!(parser(LayoutPolicy::CommitToFirstMatch).parse(&html, 5).is_empty());
    }

    #[test]
    fn unmatched_document_yields_nothing() {
        let records = parser(LayoutPolicy::default()).parse("<html><body><p>Access denied</p></body></html>", 5);
        assert!(records.is_empty());
    }

    #[test]
    fn reports_container_matches() {
        let html = Html::parse_document(&tiles("search-result", 2));
        let matches = parser(LayoutPolicy::default()).container_matches(&html);
        assert_eq!(
            matches,
            vec![(".product-tile".to_string(), 0), (".search-result".to_string(), 2)]
        );
    }
}
