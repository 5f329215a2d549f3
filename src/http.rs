//! HTTP client wrapper for fetching wiki pages and card images.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};

use crate::config::HTTP_TIMEOUT_SECS;
use crate::error::{Result, ScrapeError};

/// Browser-style user agent. atwiki serves an error page to unknown clients.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Create a configured HTTP client.
///
/// # Returns
/// A `reqwest::blocking::Client` with browser-like headers, a timeout, and
/// a user agent the wiki accepts.
pub fn create_client() -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("ja,en-US;q=0.7,en;q=0.3"),
    );

    let client = Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .build()?;
    Ok(client)
}

/// Download raw bytes from a URL.
///
/// Single attempt; a non-success status is an error. The caller decides
/// whether a failure is fatal (a missing card image only skips that entry).
///
/// # Arguments
/// * `client` - HTTP client to use
/// * `url` - URL to download from
///
/// # Returns
/// Raw bytes of the response body
pub fn download_bytes(client: &Client, url: &str) -> Result<Vec<u8>> {
    let response = client.get(url).send()?.error_for_status()?;
    let bytes = response.bytes()?;
    Ok(bytes.to_vec())
}

/// Fetch a wiki page as text.
///
/// Character decoding follows the response's `Content-Type` charset,
/// defaulting to UTF-8.
pub fn fetch_page(client: &Client, url: &str) -> Result<String> {
    client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.text())
        .map_err(|source| ScrapeError::PageFetch {
            url: url.to_string(),
            source,
        })
}
