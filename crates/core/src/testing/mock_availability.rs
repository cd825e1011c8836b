//! Mock availability checker for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::availability::{
    capped, AvailabilityChecker, AvailabilityMap, CacheAvailability, CachedFile,
};
use crate::debrid::{DebridError, DebridProvider};
use crate::magnet::InfoHash;

/// A recorded availability check for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedCheck {
    /// Hashes actually sent (after the per-check cap).
    pub hashes: Vec<InfoHash>,
    pub credential: String,
}

/// Mock implementation of the AvailabilityChecker trait.
///
/// Applies the same per-check cap as the real checkers, so only hashes
/// within the first hundred can be reported cached.
#[derive(Debug)]
pub struct MockAvailabilityChecker {
    provider: DebridProvider,
    /// Hashes the mock provider holds.
    cached: Arc<RwLock<AvailabilityMap>>,
    /// Recorded checks.
    checks: Arc<RwLock<Vec<RecordedCheck>>>,
    /// If set, the next check will fail with this error.
    next_error: Arc<RwLock<Option<DebridError>>>,
}

impl MockAvailabilityChecker {
    pub fn new(provider: DebridProvider) -> Self {
        Self {
            provider,
            cached: Arc::new(RwLock::new(AvailabilityMap::new())),
            checks: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Mark a hash as cached with a single-variant file manifest.
    pub async fn add_cached(&self, info_hash: InfoHash, files: Vec<CachedFile>) {
        self.cached.write().await.insert(
            info_hash.clone(),
            CacheAvailability {
                info_hash,
                variants: vec![files],
            },
        );
    }

    /// Configure the next check to fail with the given error.
    pub async fn set_next_error(&self, error: DebridError) {
        *self.next_error.write().await = Some(error);
    }

    /// Get recorded checks.
    pub async fn recorded_checks(&self) -> Vec<RecordedCheck> {
        self.checks.read().await.clone()
    }
}

#[async_trait]
impl AvailabilityChecker for MockAvailabilityChecker {
    fn provider(&self) -> DebridProvider {
        self.provider
    }

    async fn check_availability(
        &self,
        hashes: &[InfoHash],
        credential: &str,
    ) -> Result<AvailabilityMap, DebridError> {
        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        let sent = capped(hashes);
        self.checks.write().await.push(RecordedCheck {
            hashes: sent.to_vec(),
            credential: credential.to_string(),
        });

        let cached = self.cached.read().await;
        Ok(sent
            .iter()
            .filter_map(|hash| cached.get(hash).map(|entry| (hash.clone(), entry.clone())))
            .collect())
    }
}
