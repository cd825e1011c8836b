//! Mock source adapter for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::searcher::{Candidate, SearchError, SourceAdapter, SourceQuery};

/// Mock implementation of the SourceAdapter trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable candidates
/// - Track queries for assertions
/// - Simulate failures
#[derive(Debug)]
pub struct MockSourceAdapter {
    name: String,
    /// Configured candidates to return.
    results: Arc<RwLock<Vec<Candidate>>>,
    /// Recorded queries.
    searches: Arc<RwLock<Vec<SourceQuery>>>,
    /// If set, the next search will fail with this error.
    next_error: Arc<RwLock<Option<SearchError>>>,
    /// Fail every search.
    always_fail: Arc<RwLock<bool>>,
}

impl MockSourceAdapter {
    /// Create a new mock source with no results.
    pub fn new(name: &str) -> Self {
        Self::with_results(name, Vec::new())
    }

    /// Create a mock source with predefined results.
    pub fn with_results(name: &str, results: Vec<Candidate>) -> Self {
        Self {
            name: name.to_string(),
            results: Arc::new(RwLock::new(results)),
            searches: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            always_fail: Arc::new(RwLock::new(false)),
        }
    }

    /// Create a mock source whose every search fails.
    pub fn failing(name: &str) -> Self {
        let mut source = Self::new(name);
        source.always_fail = Arc::new(RwLock::new(true));
        source
    }

    /// Set the results to return for subsequent searches.
    pub async fn set_results(&self, results: Vec<Candidate>) {
        *self.results.write().await = results;
    }

    /// Configure the next search to fail with the given error.
    pub async fn set_next_error(&self, error: SearchError) {
        *self.next_error.write().await = Some(error);
    }

    /// Get recorded queries.
    pub async fn recorded_searches(&self) -> Vec<SourceQuery> {
        self.searches.read().await.clone()
    }

    /// Get the number of searches performed.
    pub async fn search_count(&self) -> usize {
        self.searches.read().await.len()
    }
}

#[async_trait]
impl SourceAdapter for MockSourceAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, query: &SourceQuery) -> Result<Vec<Candidate>, SearchError> {
        self.searches.write().await.push(query.clone());

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }
        if *self.always_fail.read().await {
            return Err(SearchError::ConnectionFailed(format!(
                "{} is unreachable",
                self.name
            )));
        }

        let results = self.results.read().await;
        Ok(results
            .iter()
            .take(query.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }
}
