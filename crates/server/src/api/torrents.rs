//! Multi-scraper search handlers.
//!
//! Every parameter is optional at the HTTP layer; an empty title or query
//! simply yields an empty list.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use cachescout_core::Candidate;
use serde::Deserialize;

use super::handlers::ListResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
    /// Per-source limit; the configured default applies when absent.
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct MovieParams {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct TvParams {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub season: Option<u32>,
    #[serde(default)]
    pub episode: Option<u32>,
}

/// GET /api/v1/torrents/search?query=&limit=
pub async fn search_all(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Json<ListResponse<Candidate>> {
    let results = state
        .scout()
        .search_all_sources(&params.query, params.limit)
        .await;
    Json(ListResponse::new(results))
}

/// GET /api/v1/torrents/movie?title=&year=
pub async fn search_movie(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MovieParams>,
) -> Json<ListResponse<Candidate>> {
    let results = state.scout().search_movie(&params.title, params.year).await;
    Json(ListResponse::new(results))
}

/// GET /api/v1/torrents/tv?title=&season=&episode=
pub async fn search_tv(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TvParams>,
) -> Json<ListResponse<Candidate>> {
    let results = state
        .scout()
        .search_tv(&params.title, params.season, params.episode)
        .await;
    Json(ListResponse::new(results))
}
