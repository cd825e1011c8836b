//! Debrid cache search and link resolution handlers.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use cachescout_core::{
    extract_hash_from_magnet, CachedResult, ContentKind, DebridProvider, LinkResolutionState,
    NoLinkReason, SourceQuery,
};

use super::middleware::BearerToken;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CachedSearchRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub kind: ContentKind,
    #[serde(default)]
    pub year: Option<u32>,
    #[serde(default)]
    pub season: Option<u32>,
    #[serde(default)]
    pub episode: Option<u32>,
    /// `real_debrid` when absent; short names such as `rd` are accepted.
    #[serde(default)]
    pub provider: Option<String>,
}

impl CachedSearchRequest {
    fn source_query(&self) -> SourceQuery {
        SourceQuery {
            text: self.query.trim().to_string(),
            imdb_id: self
                .imdb_id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
            kind: self.kind,
            year: self.year,
            season: self.season,
            episode: self.episode,
            limit: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CachedSearchResponse {
    pub success: bool,
    pub provider: Option<DebridProvider>,
    pub count: usize,
    pub results: Vec<CachedResult>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    #[serde(default)]
    pub info_hash: Option<String>,
    /// Used for the hash when `info_hash` is absent.
    #[serde(default)]
    pub magnet: Option<String>,
    #[serde(default)]
    pub file_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub success: bool,
    pub info_hash: String,
    pub download_url: Option<String>,
    pub polls: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<NoLinkReason>,
    pub state: LinkResolutionState,
}

/// POST /api/v1/debrid/cached
///
/// Aggregator candidates the chosen provider holds in cache, best quality
/// first.
pub async fn search_cached(
    State(state): State<Arc<AppState>>,
    BearerToken(token): BearerToken,
    Json(body): Json<CachedSearchRequest>,
) -> Json<CachedSearchResponse> {
    let provider = match body.provider.as_deref() {
        None => Some(DebridProvider::default()),
        Some(name) => name
            .parse::<DebridProvider>()
            .map_err(|e| warn!(error = %e, "Ignoring cached search"))
            .ok(),
    };

    let results = match provider {
        Some(provider) => {
            state
                .scout()
                .search_cached(&body.source_query(), provider, &token)
                .await
        }
        None => Vec::new(),
    };

    Json(CachedSearchResponse {
        success: true,
        provider,
        count: results.len(),
        results,
    })
}

/// POST /api/v1/debrid/resolve
///
/// Add a torrent to Real-Debrid and wait for its direct download link.
pub async fn resolve(
    State(state): State<Arc<AppState>>,
    BearerToken(token): BearerToken,
    Json(body): Json<ResolveRequest>,
) -> Json<ResolveResponse> {
    let info_hash = body
        .info_hash
        .filter(|h| !h.trim().is_empty())
        .or_else(|| body.magnet.as_deref().and_then(extract_hash_from_magnet))
        .unwrap_or_default();

    let resolution = state
        .scout()
        .check_and_resolve(info_hash.trim(), &token, body.file_id.as_deref())
        .await;

    Json(ResolveResponse {
        success: resolution.link().is_some(),
        info_hash,
        download_url: resolution.link().map(str::to_string),
        polls: resolution.polls,
        reason: resolution.failure,
        state: resolution.state,
    })
}
