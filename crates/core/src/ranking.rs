//! Merging cache data into candidates and ordering results.

use serde::{Deserialize, Serialize};

use crate::availability::AvailabilityMap;
use crate::extract::Quality;
use crate::searcher::Candidate;

/// A candidate confirmed cached at a provider, with its best file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CachedResult {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub cached: bool,
    pub file_id: String,
    pub filename: String,
    pub filesize: u64,
}

/// Anything that can be ordered by the ranking strategies.
pub trait Ranked {
    fn quality(&self) -> Quality;
    fn seeders(&self) -> u32;
}

impl Ranked for Candidate {
    fn quality(&self) -> Quality {
        self.quality
    }

    fn seeders(&self) -> u32 {
        self.seeders
    }
}

impl Ranked for CachedResult {
    fn quality(&self) -> Quality {
        self.candidate.quality
    }

    fn seeders(&self) -> u32 {
        self.candidate.seeders
    }
}

/// How a result list is ordered.
///
/// Cached searches order by quality; multi-source scrapes order by seeders.
/// Both sorts are stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingStrategy {
    /// Best quality first (2160p, 1080p, 720p, 480p).
    ByQuality,
    /// Most seeders first; quality is not a tiebreak.
    BySeeders,
}

impl RankingStrategy {
    pub fn sort<T: Ranked>(&self, items: &mut [T]) {
        match self {
            RankingStrategy::ByQuality => items.sort_by_key(|item| item.quality().rank()),
            RankingStrategy::BySeeders => {
                items.sort_by(|a, b| b.seeders().cmp(&a.seeders()))
            }
        }
    }
}

/// Keep candidates whose hash is cached with a playable file, in upstream
/// order. Candidates without a hash are dropped.
pub fn merge_cached(candidates: Vec<Candidate>, availability: &AvailabilityMap) -> Vec<CachedResult> {
    candidates
        .into_iter()
        .filter_map(|candidate| {
            let entry = availability.get(candidate.info_hash.as_ref()?)?;
            let best = entry.best_file()?.clone();
            Some(CachedResult {
                candidate,
                cached: true,
                file_id: best.id,
                filename: best.filename,
                filesize: best.filesize,
            })
        })
        .collect()
}
