use once_cell::sync::Lazy;
use regex::Regex;

static PRICE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$?(\d+(?:,\d{3})*(?:\.\d{2})?)").expect("Invalid price regex")
});

static CURRENCY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[$€£]|\bUSD\b").expect("Invalid currency regex"));

/// Parse the first amount in `price_text`, dropping thousands separators.
pub fn parse_price(price_text: &str) -> Option<f64> {
    let captures = PRICE_REGEX.captures(price_text)?;
    let amount = captures.get(1)?.as_str().replace(',', "");
    amount.parse::<f64>().ok()
}

/// Whether the text carries a currency symbol or code.
pub fn has_currency_marker(text: &str) -> bool {
    CURRENCY_REGEX.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dollar_amounts_with_separators() {
        assert_eq!(parse_price("$1,234.56"), Some(1234.56));
        assert_eq!(parse_price("$12.45 / each"), Some(12.45));
        assert_eq!(parse_price("Price: 7"), Some(7.0));
    }

    #[test]
    fn returns_none_without_digits() {
        assert_eq!(parse_price("Call for price"), None);
        assert_eq!(parse_price(""), None);
    }

    #[test]
    fn detects_currency_markers() {
        assert!(has_currency_marker("$4.10"));
        assert!(has_currency_marker("12,00 €"));
        assert!(has_currency_marker("4.10 USD"));
        assert!(!has_currency_marker("Pack of 10"));
    }
}
