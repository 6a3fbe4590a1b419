use std::path::Path;
use tracing::warn;
use url::Url;

use crate::utils::error::{AppError, Result};

/// Read product URLs from a file, one per line.
///
/// Blank lines and `#` comments are skipped, order and duplicates are kept.
pub fn load_urls(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)?;
    let urls = parse_urls(&text);

    if urls.is_empty() {
        return Err(AppError::Input(format!(
            "no URLs found in {}",
            path.display()
        )));
    }
    Ok(urls)
}

pub fn parse_urls(text: &str) -> Vec<String> {
    text.lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|(line_number, line)| match Url::parse(line) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Some(line.to_string()),
            _ => {
                warn!(line = line_number, value = line, "Skipping invalid URL");
                None
            }
        })
        .collect()
}
