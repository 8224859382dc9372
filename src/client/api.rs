//! iTunes Search API client implementation.

use reqwest::Client;
use thiserror::Error;

use super::models::{SearchResponse, Track};

/// API client errors.
#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Client for the public iTunes Search API. No authentication, no pagination.
#[derive(Debug, Clone)]
pub struct ItunesClient {
    /// HTTP client
    client: Client,

    /// Base search URL
    base_url: String,
}

impl Default for ItunesClient {
    fn default() -> Self {
        Self::new("https://itunes.apple.com")
    }
}

impl ItunesClient {
    /// Create a new API client against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build the search URL with query parameters.
    fn build_url(&self, params: &[(&str, &str)]) -> String {
        let mut url = format!("{}/search", self.base_url);

        let query_parts: Vec<String> = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect();

        url.push('?');
        url.push_str(&query_parts.join("&"));
        url
    }

    /// Search the music catalog for a free-text term, returning at most
    /// `limit` tracks. One shot: no retry, no timeout, no cancellation of an
    /// in-flight request when a new search starts.
    pub async fn search(&self, term: &str, limit: u32) -> Result<Vec<Track>, ApiClientError> {
        let limit_str = limit.to_string();
        let url = self.build_url(&[("term", term), ("media", "music"), ("limit", &limit_str)]);

        let response = self.client.get(&url).send().await?;
        let text = response.text().await?;

        let parsed: SearchResponse = serde_json::from_str(&text).map_err(|e| {
            ApiClientError::InvalidResponse(format!(
                "Failed to parse response: {}. Body: {}",
                e,
                truncate_body(&text, 500)
            ))
        })?;

        Ok(parsed.results)
    }
}

/// Truncate a response body for error messages without splitting a
/// multibyte character.
fn truncate_body(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_url_encodes_term() {
        let client = ItunesClient::new("https://itunes.apple.com/");
        let url = client.build_url(&[("term", "daft punk"), ("media", "music"), ("limit", "10")]);
        assert_eq!(
            url,
            "https://itunes.apple.com/search?term=daft%20punk&media=music&limit=10"
        );
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = ItunesClient::new("http://localhost:8080///");
        let url = client.build_url(&[("term", "x")]);
        assert!(url.starts_with("http://localhost:8080/search?"));
    }

    #[test]
    fn body_truncation_respects_char_boundaries() {
        // 3-byte characters: 500 is not a boundary, 498 is
        let body = "€".repeat(200);
        let cut = truncate_body(&body, 500);
        assert_eq!(cut.len(), 498);
        assert_eq!(cut.chars().count(), 166);

        let short = "plain ascii";
        assert_eq!(truncate_body(short, 500), short);
    }
}
