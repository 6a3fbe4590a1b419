//! Product identifier (ASIN) extraction from product URLs.

use regex::Regex;
use std::sync::LazyLock;

/// Returned when no rule finds an identifier in the URL.
pub const UNKNOWN_ASIN: &str = "UNKNOWN_ASIN";

/// Rules are tried in order; the first capture wins.
static ASIN_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Path segment forms: /dp/<ID>, /gp/product/<ID>, /product/<ID>
        r"/(?:dp|gp/product|product)/([A-Za-z0-9]{10})",
        // Query parameter form: ?ASIN=<ID> or &asin=<ID>
        r"(?i)[?&]asin=([A-Za-z0-9]{10})",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("ASIN rule must compile"))
    .collect()
});

/// Derive the canonical product identifier from a URL string.
///
/// Never fails: URLs without a recognizable identifier yield [`UNKNOWN_ASIN`].
/// The identifier is upper-cased so `/dp/b09g9bl5cp` and `/dp/B09G9BL5CP`
/// compare equal when detecting redirects.
pub fn extract_asin(url: &str) -> String {
    ASIN_RULES
        .iter()
        .find_map(|rule| rule.captures(url))
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_ascii_uppercase())
        .unwrap_or_else(|| UNKNOWN_ASIN.to_string())
}
