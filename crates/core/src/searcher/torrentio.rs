//! Torrentio stream aggregator adapter.

use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::EndpointConfig;
use crate::magnet::InfoHash;

use super::{
    build_client, fetch_body, Candidate, ContentKind, SearchError, SourceAdapter, SourceQuery,
};

/// Label used when a stream title names no known tracker or group.
pub const TORRENTIO_SOURCE: &str = "Torrentio";

/// Year used in the `title:year` key when a movie query carries none.
const FALLBACK_MOVIE_YEAR: u32 = 2024;

/// Adapter for the Torrentio `stream` endpoint.
pub struct TorrentioAdapter {
    client: Client,
    base_url: String,
}

impl TorrentioAdapter {
    pub fn new(endpoint: &EndpointConfig, user_agent: &str) -> Self {
        Self {
            client: build_client(endpoint.timeout_secs, user_agent),
            base_url: endpoint.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build the stream URL, or `None` when the query has no usable identifier.
    fn build_stream_url(&self, query: &SourceQuery) -> Option<String> {
        stream_id(query).map(|id| format!("{}/stream/{}.json", self.base_url, id))
    }
}

/// Stream id: the IMDb id when known, otherwise a `title:year` or
/// `title:season:episode` composite key.
fn stream_id(query: &SourceQuery) -> Option<String> {
    let imdb_id = query.imdb_id.as_deref().map(str::trim).filter(|id| !id.is_empty());
    let title = query.text.trim();

    match query.kind {
        ContentKind::Movie => match imdb_id {
            Some(id) => Some(format!("movie/{}", urlencoding::encode(id))),
            None if !title.is_empty() => Some(format!(
                "movie/{}:{}",
                urlencoding::encode(title),
                query.year.unwrap_or(FALLBACK_MOVIE_YEAR)
            )),
            None => None,
        },
        ContentKind::Tv => {
            let key = match imdb_id {
                Some(id) => urlencoding::encode(id),
                None if !title.is_empty() => urlencoding::encode(title),
                None => return None,
            };
            Some(format!(
                "series/{}:{}:{}",
                key,
                query.season.unwrap_or(1),
                query.episode.unwrap_or(1)
            ))
        }
    }
}

#[derive(Debug, Deserialize)]
struct TorrentioResponse {
    #[serde(default)]
    streams: Vec<TorrentioStream>,
}

#[derive(Debug, Deserialize)]
struct TorrentioStream {
    #[serde(default)]
    title: String,
    #[serde(rename = "infoHash", default)]
    info_hash: Option<String>,
}

/// Parse a stream listing, keeping streams with a well-formed hash.
///
/// Repeated hashes keep their first stream.
pub(crate) fn parse_streams(body: &str, limit: Option<usize>) -> Result<Vec<Candidate>, SearchError> {
    let response: TorrentioResponse = serde_json::from_str(body)
        .map_err(|e| SearchError::ParseError(format!("Failed to parse response: {}", e)))?;

    let mut seen = HashSet::new();
    let candidates = response
        .streams
        .into_iter()
        .filter_map(|stream| {
            let hash = InfoHash::parse(stream.info_hash.as_deref()?)?;
            seen.insert(hash.clone())
                .then(|| Candidate::from_title(stream.title, hash, TORRENTIO_SOURCE))
        })
        .take(limit.unwrap_or(usize::MAX))
        .collect();

    Ok(candidates)
}

#[async_trait]
impl SourceAdapter for TorrentioAdapter {
    fn name(&self) -> &str {
        "torrentio"
    }

    async fn search(&self, query: &SourceQuery) -> Result<Vec<Candidate>, SearchError> {
        let Some(url) = self.build_stream_url(query) else {
            debug!(source = self.name(), "No identifier for stream lookup, skipping");
            return Ok(Vec::new());
        };

        debug!(source = self.name(), url = %url, "Fetching streams");
        let body = fetch_body(self.client.get(&url)).await?;
        let candidates = parse_streams(&body, query.limit)?;

        debug!(
            source = self.name(),
            results = candidates.len(),
            "Stream lookup complete"
        );
        Ok(candidates)
    }
}
