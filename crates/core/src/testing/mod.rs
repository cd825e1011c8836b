//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of every trait seam, allowing
//! service and HTTP tests without reaching real indexers or debrid providers.
//!
//! # Example
//!
//! ```rust,ignore
//! use cachescout_core::testing::{fixtures, MockAvailabilityChecker, MockSourceAdapter};
//!
//! let source = MockSourceAdapter::with_results("torrentio", vec![
//!     fixtures::candidate("Movie.2021.1080p 👤 200", 1),
//! ]);
//! let checker = MockAvailabilityChecker::new(DebridProvider::RealDebrid);
//! checker.add_cached(fixtures::info_hash(1), vec![fixtures::file("1", "movie.mkv", 4_000)]).await;
//! ```

mod mock_availability;
mod mock_debrid_api;
mod mock_source;
mod recording_sleeper;

pub use mock_availability::{MockAvailabilityChecker, RecordedCheck};
pub use mock_debrid_api::{DebridApiCalls, DebridCall, MockDebridApi};
pub use mock_source::MockSourceAdapter;
pub use recording_sleeper::RecordingSleeper;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::availability::{CacheAvailability, CachedFile};
    use crate::magnet::InfoHash;
    use crate::resolver::{RemoteFile, RemoteStatus, RemoteTorrentInfo};
    use crate::searcher::Candidate;

    /// A deterministic info hash derived from `seed`.
    pub fn info_hash(seed: u32) -> InfoHash {
        InfoHash::parse(&format!("{:040x}", seed)).expect("generated hash is valid")
    }

    /// An aggregator candidate; attributes are extracted from `title`.
    pub fn candidate(title: &str, seed: u32) -> Candidate {
        Candidate::from_title(title, info_hash(seed), "Torrentio")
    }

    /// A scraped candidate with a magnet for `seed`.
    pub fn listing(title: &str, seed: u32, seeders: u32, source: &str) -> Candidate {
        Candidate::from_listing(
            title,
            format!("{}&dn=fixture", info_hash(seed).magnet_uri()),
            "1.4 GB",
            seeders,
            seeders / 10,
            source,
        )
    }

    pub fn file(id: &str, filename: &str, filesize: u64) -> CachedFile {
        CachedFile::new(id, filename, filesize)
    }

    /// Cache entry with a single variant.
    pub fn availability(seed: u32, files: Vec<CachedFile>) -> CacheAvailability {
        CacheAvailability {
            info_hash: info_hash(seed),
            variants: vec![files],
        }
    }

    /// Remote torrent snapshot holding one video file.
    pub fn remote_info(status: RemoteStatus, links: &[&str]) -> RemoteTorrentInfo {
        RemoteTorrentInfo {
            status,
            files: vec![RemoteFile {
                id: 1,
                path: "/Movie.2021.1080p.mkv".to_string(),
                bytes: 4_000_000_000,
            }],
            links: links.iter().map(|l| l.to_string()).collect(),
        }
    }
}
