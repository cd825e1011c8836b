//! Types for the torrent source adapters.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::extract::{extract_quality, extract_seeders, extract_size, extract_source, Quality};
use crate::magnet::{info_hash_from_magnet, InfoHash};

/// Kind of content being searched.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    #[default]
    Movie,
    #[serde(alias = "series")]
    Tv,
}

/// Query parameters shared by every source adapter.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SourceQuery {
    /// Free-text title or search phrase.
    pub text: String,
    /// Canonical external identifier (IMDb id), preferred when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub kind: ContentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
    /// Maximum results per source (None = whatever the source returns).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl SourceQuery {
    /// A plain free-text query.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// A movie query.
    pub fn movie(title: impl Into<String>, year: Option<u32>) -> Self {
        Self {
            text: title.into(),
            kind: ContentKind::Movie,
            year,
            ..Default::default()
        }
    }

    /// A TV query for a season and/or episode.
    pub fn tv(title: impl Into<String>, season: Option<u32>, episode: Option<u32>) -> Self {
        Self {
            text: title.into(),
            kind: ContentKind::Tv,
            season,
            episode,
            ..Default::default()
        }
    }

    pub fn with_imdb_id(mut self, imdb_id: impl Into<String>) -> Self {
        self.imdb_id = Some(imdb_id.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The phrase sent to free-text search pages.
    ///
    /// Movies append the year; TV appends `SxxEyy` (or `Sxx` without an
    /// episode).
    pub fn search_text(&self) -> String {
        let mut text = self.text.trim().to_string();
        match self.kind {
            ContentKind::Movie => {
                if let Some(year) = self.year {
                    text.push_str(&format!(" {}", year));
                }
            }
            ContentKind::Tv => match (self.season, self.episode) {
                (Some(season), Some(episode)) => {
                    text.push_str(&format!(" S{:02}E{:02}", season, episode));
                }
                (Some(season), None) => text.push_str(&format!(" S{:02}", season)),
                _ => {}
            },
        }
        text
    }
}

/// One torrent discovered by a source adapter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candidate {
    pub title: String,
    /// Absent when the source only exposes a non-hex magnet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_hash: Option<InfoHash>,
    pub magnet: String,
    pub quality: Quality,
    /// Human-readable size, or "Unknown".
    pub size: String,
    pub seeders: u32,
    #[serde(default)]
    pub leechers: u32,
    /// Tracker, release group or site label.
    pub source: String,
}

impl Candidate {
    /// Build a candidate from an aggregator title, extracting every attribute
    /// from the title text.
    pub fn from_title(title: impl Into<String>, info_hash: InfoHash, default_source: &str) -> Self {
        let title = title.into();
        Self {
            magnet: info_hash.magnet_uri(),
            info_hash: Some(info_hash),
            quality: extract_quality(&title),
            size: extract_size(&title),
            seeders: extract_seeders(&title),
            leechers: 0,
            source: extract_source(&title, default_source),
            title,
        }
    }

    /// Build a candidate from a scraped listing that carries its own magnet.
    pub fn from_listing(
        title: impl Into<String>,
        magnet: impl Into<String>,
        size: impl Into<String>,
        seeders: u32,
        leechers: u32,
        source: impl Into<String>,
    ) -> Self {
        let title = title.into();
        let magnet = magnet.into();
        Self {
            info_hash: info_hash_from_magnet(&magnet),
            quality: extract_quality(&title),
            magnet,
            size: size.into(),
            seeders,
            leechers,
            source: source.into(),
            title,
        }
    }
}

/// Errors that can occur while querying a source.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Source connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Source API error: {0}")]
    ApiError(String),

    #[error("Failed to parse source response: {0}")]
    ParseError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// A single upstream torrent source.
///
/// Implementations hold no mutable state and are safe to query in parallel.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Source name for logging and metrics.
    fn name(&self) -> &str;

    /// Search this source.
    async fn search(&self, query: &SourceQuery) -> Result<Vec<Candidate>, SearchError>;
}
