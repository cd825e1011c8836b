//! Torrent source adapters.
//!
//! This module provides a `SourceAdapter` trait implemented by the Torrentio
//! stream aggregator and the YTS, 1337x and Pirate Bay scrapers. Adapters are
//! stateless and never cache results.

mod leetx;
mod piratebay;
mod scrape;
mod torrentio;
mod types;
mod yts;

pub use leetx::LeetxAdapter;
pub use piratebay::PirateBayAdapter;
pub use torrentio::TorrentioAdapter;
pub use types::*;
pub use yts::YtsAdapter;

use std::time::Duration;

use reqwest::{Client, RequestBuilder};

/// Build the HTTP client used by an adapter.
pub(crate) fn build_client(timeout_secs: u64, user_agent: &str) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(user_agent)
        .build()
        .expect("Failed to create HTTP client")
}

/// Map a transport failure onto a search error.
pub(crate) fn classify_request_error(e: reqwest::Error) -> SearchError {
    if e.is_timeout() {
        SearchError::Timeout
    } else if e.is_connect() {
        SearchError::ConnectionFailed(e.to_string())
    } else {
        SearchError::ApiError(e.to_string())
    }
}

/// Send a request and return the body of a successful response.
pub(crate) async fn fetch_body(request: RequestBuilder) -> Result<String, SearchError> {
    let response = request.send().await.map_err(classify_request_error)?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(SearchError::ApiError(format!(
            "HTTP {}: {}",
            status,
            body.chars().take(200).collect::<String>()
        )));
    }

    response.text().await.map_err(classify_request_error)
}
