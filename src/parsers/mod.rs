pub mod availability;
pub mod price;
pub mod query;

pub use availability::*;
pub use price::*;
pub use query::*;

use html_escape::decode_html_entities;

/// Clean and normalize text by removing extra whitespace and decoding HTML entities
pub fn clean_text(text: &str) -> String {
    let decoded = decode_html_entities(text);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep only `[A-Za-z0-9_-]` from a scraped part number.
pub fn sanitize_part_number(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_collapses_whitespace_and_entities() {
        assert_eq!(clean_text("  Hex&nbsp;Bolt \n\t M8  "), "Hex Bolt M8");
        assert_eq!(clean_text("Nut &amp; Washer"), "Nut & Washer");
        assert_eq!(clean_text("   "), "");
    }

    #[test]
    fn part_numbers_lose_punctuation() {
        assert_eq!(sanitize_part_number("Item # 4KH29"), "Item4KH29");
        assert_eq!(sanitize_part_number("6203-2Z_RS"), "6203-2Z_RS");
        assert_eq!(sanitize_part_number("1/4\"-20"), "14-20");
    }
}
