//! Types for cache availability checks.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::debrid::{DebridError, DebridProvider};
use crate::magnet::InfoHash;

/// Provider limit on hashes per availability request.
pub const MAX_HASHES_PER_CHECK: usize = 100;

/// File extensions treated as playable video.
pub const VIDEO_EXTENSIONS: &[&str] = &[".mkv", ".mp4", ".avi", ".mov", ".wmv", ".m4v"];

/// Whether a file name or path ends in a recognized video extension.
pub fn is_video_file(name: &str) -> bool {
    let lower = name.to_lowercase();
    VIDEO_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// The hashes actually sent to a provider: the first [`MAX_HASHES_PER_CHECK`].
pub fn capped(hashes: &[InfoHash]) -> &[InfoHash] {
    &hashes[..hashes.len().min(MAX_HASHES_PER_CHECK)]
}

/// One file of a cached torrent variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CachedFile {
    /// Provider-internal file id.
    pub id: String,
    pub filename: String,
    pub filesize: u64,
}

impl CachedFile {
    pub fn new(id: impl Into<String>, filename: impl Into<String>, filesize: u64) -> Self {
        Self {
            id: id.into(),
            filename: filename.into(),
            filesize,
        }
    }
}

/// Cache status of one hash at one provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheAvailability {
    pub info_hash: InfoHash,
    /// Cached variants in provider order; each is a file manifest.
    pub variants: Vec<Vec<CachedFile>>,
}

impl CacheAvailability {
    /// The largest video file of the first variant.
    ///
    /// Ties keep the first file encountered. `None` means the hash is not
    /// usably cached.
    pub fn best_file(&self) -> Option<&CachedFile> {
        let variant = self.variants.first()?;

        variant
            .iter()
            .filter(|file| is_video_file(&file.filename))
            .fold(None, |best: Option<&CachedFile>, file| match best {
                Some(current) if current.filesize >= file.filesize => Some(current),
                _ => Some(file),
            })
    }
}

/// Mapping of cached hashes to their availability.
pub type AvailabilityMap = HashMap<InfoHash, CacheAvailability>;

/// Insert an entry only when some variant lists at least one file.
pub(crate) fn insert_cached(
    map: &mut AvailabilityMap,
    info_hash: InfoHash,
    variants: Vec<Vec<CachedFile>>,
) {
    if variants.iter().any(|v| !v.is_empty()) {
        map.insert(info_hash.clone(), CacheAvailability { info_hash, variants });
    }
}

/// A provider's instant-availability endpoint.
#[async_trait]
pub trait AvailabilityChecker: Send + Sync {
    /// Provider this checker talks to.
    fn provider(&self) -> DebridProvider;

    /// Check which of `hashes` the provider holds.
    ///
    /// Only the first [`MAX_HASHES_PER_CHECK`] hashes are checked. Hashes the
    /// provider does not report as cached are absent from the result.
    async fn check_availability(
        &self,
        hashes: &[InfoHash],
        credential: &str,
    ) -> Result<AvailabilityMap, DebridError>;
}
