//! Attribute extraction from free-text torrent titles.
//!
//! Upstream titles are semi-structured: the aggregator indexer embeds glyph
//! markers (`💾 2.1 GB`, `👤 150`) which are tried first, with generic
//! patterns as fallback. Every extractor is pure and returns a default when
//! nothing matches.

mod quality;
mod title;

pub use quality::Quality;
pub use title::{
    extract_quality, extract_seeders, extract_size, extract_source, KNOWN_RELEASE_GROUPS,
    KNOWN_TRACKERS, UNKNOWN_SIZE,
};
