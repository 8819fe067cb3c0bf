/// Rewrite a query into the form catalogs match most loosely: punctuation
/// becomes whitespace, whitespace is collapsed, and numeric tokens lose
/// their leading zeros.
pub fn sanitize_query(query: &str) -> String {
    let spaced: String = query
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    spaced
        .split_whitespace()
        .map(strip_leading_zeros)
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_leading_zeros(token: &str) -> &str {
    if !token.chars().all(|c| c.is_ascii_digit()) {
        return token;
    }
    let stripped = token.trim_start_matches('0');
    if stripped.is_empty() {
        // keep a single zero for all-zero tokens
        &token[token.len() - 1..]
    } else {
        stripped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_collapses_whitespace() {
        assert_eq!(sanitize_query("  6203-2Z,   bearing! "), "6203 2Z bearing");
    }

    #[test]
    fn drops_leading_zeros() {
        assert_eq!(sanitize_query("006203 bearing"), "6203 bearing");
        assert_eq!(sanitize_query("000 seal"), "0 seal");
        assert_eq!(sanitize_query("007B seal"), "007B seal");
    }

    #[test]
    fn clean_queries_are_unchanged() {
        assert_eq!(sanitize_query("6203 bearing"), "6203 bearing");
    }
}
