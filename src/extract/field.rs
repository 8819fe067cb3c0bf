use scraper::ElementRef;

use super::locator::{node_text, Locator};

/// First non-empty text found by trying `locators` in order against `node`.
/// Empty string when no candidate matches.
pub fn extract_field(node: ElementRef<'_>, locators: &[Box<dyn Locator>]) -> String {
    locators
        .iter()
        .find_map(|locator| {
            locator
                .locate(node)
                .into_iter()
                .map(node_text)
                .find(|text| !text.is_empty())
        })
        .unwrap_or_default()
}
