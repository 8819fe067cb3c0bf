use url::Url;

/// Absolute form of `href`: kept as-is when already absolute, otherwise
/// joined onto `base`. Script and fragment-only links resolve to nothing.
pub fn resolve_link(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') || href.to_lowercase().starts_with("javascript:") {
        return None;
    }

    match Url::parse(href) {
        Ok(absolute) => Some(absolute.to_string()),
        Err(url::ParseError::RelativeUrlWithoutBase) => base.join(href).ok().map(String::from),
        Err(_) => None,
    }
}
