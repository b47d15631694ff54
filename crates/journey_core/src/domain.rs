//! Domain extraction from navigated URLs.

use url::Url;

/// Schemes whose pages are recorded. Everything else (browser-internal
/// pages, extension pages, `file:`, `data:`, `javascript:`) is ignored.
const WEB_SCHEMES: &[&str] = &["http", "https"];

/// Extracts the hostname used as the aggregation key for `raw`.
///
/// Returns `None` for malformed URLs, non-web schemes and URLs without a
/// host. The hostname is returned exactly as the URL parser produces it:
/// `www.` prefixes and trailing dots are kept.
///
/// # Examples
///
/// ```
/// use journey_core::extract_domain;
///
/// assert_eq!(extract_domain("https://news.example.com/a?b=1"), Some("news.example.com".to_string()));
/// assert_eq!(extract_domain("chrome://settings"), None);
/// assert_eq!(extract_domain("not a url"), None);
/// ```
pub fn extract_domain(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }

    let parsed = Url::parse(raw).ok()?;
    if !WEB_SCHEMES.contains(&parsed.scheme()) {
        return None;
    }

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Some(host.to_string()),
        _ => None,
    }
}

/// Favicon service URL for a domain.
pub fn favicon_url(domain: &str) -> String {
    format!("https://www.google.com/s2/favicons?domain={}&sz=32", domain)
}
