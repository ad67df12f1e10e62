//! URL list parsing and normalization.
//!
//! Turns the comma-separated `--urls` value into job identifiers: entries are
//! trimmed, empty entries dropped, and entries without a scheme get
//! `https://`. Every result must parse as an absolute URL.

use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlListError {
    #[error("urls are required")]
    Empty,
    #[error("invalid URL {input:?}: {reason}")]
    Invalid { input: String, reason: String },
}

/// Adds `https://` to `raw` (trimmed) unless it already has an http(s) scheme.
/// Returns `None` for blank input.
pub fn normalize_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Some(trimmed.to_string())
    } else {
        Some(format!("https://{}", trimmed))
    }
}

/// Splits and normalizes a comma-separated URL list, keeping input order.
pub fn parse_url_list(list: &str) -> Result<Vec<String>, UrlListError> {
    let mut urls = Vec::new();
    for entry in list.split(',') {
        let Some(url) = normalize_url(entry) else {
            continue;
        };
        if let Err(e) = Url::parse(&url) {
            return Err(UrlListError::Invalid {
                input: entry.trim().to_string(),
                reason: e.to_string(),
            });
        }
        urls.push(url);
    }
    if urls.is_empty() {
        return Err(UrlListError::Empty);
    }
    Ok(urls)
}
