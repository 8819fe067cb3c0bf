const UNAVAILABLE_MARKERS: &[&str] = &["out of stock", "discontinued"];

/// `true` unless the text says the item is out of stock or discontinued.
pub fn parse_availability(text: &str) -> bool {
    let lower = text.to_lowercase();
    !UNAVAILABLE_MARKERS
        .iter()
        .any(|marker| lower.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_flag_follows_text() {
        assert!(!parse_availability("Out of Stock"));
        assert!(!parse_availability("This item has been DISCONTINUED"));
        assert!(parse_availability("Ships in 2 days"));
        assert!(parse_availability("In Stock"));
    }

    #[test]
    fn empty_text_counts_as_available() {
        assert!(parse_availability(""));
    }
}
