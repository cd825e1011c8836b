//! YTS movie API adapter.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::EndpointConfig;
use crate::extract::UNKNOWN_SIZE;
use crate::magnet::InfoHash;

use super::{build_client, fetch_body, Candidate, SearchError, SourceAdapter, SourceQuery};

/// Adapter for the YTS `list_movies` JSON endpoint.
pub struct YtsAdapter {
    client: Client,
    base_url: String,
}

impl YtsAdapter {
    pub fn new(endpoint: &EndpointConfig, user_agent: &str) -> Self {
        Self {
            client: build_client(endpoint.timeout_secs, user_agent),
            base_url: endpoint.base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct YtsResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    data: Option<YtsData>,
}

#[derive(Debug, Deserialize)]
struct YtsData {
    #[serde(default)]
    movies: Option<Vec<YtsMovie>>,
}

#[derive(Debug, Deserialize)]
struct YtsMovie {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    year: Option<u32>,
    #[serde(default)]
    torrents: Vec<YtsTorrent>,
}

#[derive(Debug, Deserialize)]
struct YtsTorrent {
    #[serde(default)]
    quality: Option<String>,
    #[serde(default)]
    hash: Option<String>,
    #[serde(default)]
    size: Option<String>,
    #[serde(default)]
    seeds: Option<u32>,
    #[serde(default)]
    peers: Option<u32>,
}

/// Parse a `list_movies` response. One candidate per torrent of each of the
/// first `limit` movies.
pub(crate) fn parse_movies(body: &str, limit: Option<usize>) -> Result<Vec<Candidate>, SearchError> {
    let response: YtsResponse = serde_json::from_str(body)
        .map_err(|e| SearchError::ParseError(format!("Failed to parse response: {}", e)))?;

    if response.status != "ok" {
        return Err(SearchError::ApiError(format!(
            "YTS status: {}",
            response.status
        )));
    }

    let movies = response.data.and_then(|d| d.movies).unwrap_or_default();

    let candidates = movies
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .flat_map(|movie| {
            let title = movie.title.unwrap_or_else(|| "Unknown".to_string());
            let year = movie.year.map(|y| y.to_string()).unwrap_or_default();
            movie
                .torrents
                .into_iter()
                .filter_map(move |torrent| build_candidate(&title, &year, torrent))
        })
        .collect();

    Ok(candidates)
}

fn build_candidate(title: &str, year: &str, torrent: YtsTorrent) -> Option<Candidate> {
    let hash = torrent.hash.filter(|h| !h.trim().is_empty())?;
    let quality = torrent.quality.unwrap_or_else(|| "720p".to_string());

    let display_name = format!("{} {} {}", title, year, quality);
    let magnet = match InfoHash::parse(&hash) {
        Some(info_hash) => info_hash.magnet_uri(),
        None => format!("magnet:?xt=urn:btih:{}", hash.trim()),
    };
    let magnet = format!("{}&dn={}", magnet, urlencoding::encode(&display_name));

    Some(Candidate::from_listing(
        format!("{} ({}) [{}]", title, year, quality),
        magnet,
        torrent.size.unwrap_or_else(|| UNKNOWN_SIZE.to_string()),
        torrent.seeds.unwrap_or(0),
        torrent.peers.unwrap_or(0),
        "YTS",
    ))
}

#[async_trait]
impl SourceAdapter for YtsAdapter {
    fn name(&self) -> &str {
        "yts"
    }

    async fn search(&self, query: &SourceQuery) -> Result<Vec<Candidate>, SearchError> {
        let url = format!("{}/list_movies.json", self.base_url);
        let query_term = query.search_text();

        let mut params = vec![("query_term", query_term)];
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }

        debug!(source = self.name(), url = %url, "Searching YTS");
        let body = fetch_body(self.client.get(&url).query(&params)).await?;
        let candidates = parse_movies(&body, query.limit)?;

        debug!(source = self.name(), results = candidates.len(), "YTS search complete");
        Ok(candidates)
    }
}
