//! Mock debrid torrent API for testing.

use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::debrid::DebridError;
use crate::resolver::{DebridTorrentApi, FileSelection, RemoteTorrentInfo};

/// Lifecycle calls that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DebridCall {
    AddMagnet,
    TorrentInfo,
    SelectFiles,
    Unrestrict,
}

/// Calls recorded by [`MockDebridApi`].
#[derive(Debug, Clone, Default)]
pub struct DebridApiCalls {
    /// Magnets submitted.
    pub added: Vec<String>,
    /// Number of info requests, including polls.
    pub info_calls: u32,
    /// (torrent id, files form value) pairs.
    pub select_files: Vec<(String, String)>,
    /// Links passed to unrestrict.
    pub unrestricted: Vec<String>,
    /// Distinct credentials seen, in first-seen order.
    pub credentials_seen: Vec<String>,
}

/// Mock implementation of the DebridTorrentApi trait.
///
/// Info responses are scripted: queued snapshots are returned in order, then
/// the default snapshot (if any) forever. Running out of both is an error.
#[derive(Debug)]
pub struct MockDebridApi {
    info_queue: Arc<RwLock<VecDeque<RemoteTorrentInfo>>>,
    default_info: Arc<RwLock<Option<RemoteTorrentInfo>>>,
    unrestricted_url: Arc<RwLock<String>>,
    failures: Arc<RwLock<HashSet<DebridCall>>>,
    calls: Arc<RwLock<DebridApiCalls>>,
}

impl Default for MockDebridApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDebridApi {
    pub fn new() -> Self {
        Self {
            info_queue: Arc::new(RwLock::new(VecDeque::new())),
            default_info: Arc::new(RwLock::new(None)),
            unrestricted_url: Arc::new(RwLock::new("https://mock.test/download".to_string())),
            failures: Arc::new(RwLock::new(HashSet::new())),
            calls: Arc::new(RwLock::new(DebridApiCalls::default())),
        }
    }

    /// Queue the next info snapshot.
    pub async fn push_info(&self, info: RemoteTorrentInfo) {
        self.info_queue.write().await.push_back(info);
    }

    /// Snapshot returned once the queue is drained.
    pub async fn set_default_info(&self, info: RemoteTorrentInfo) {
        *self.default_info.write().await = Some(info);
    }

    /// Direct URL returned by unrestrict.
    pub async fn set_unrestricted(&self, url: &str) {
        *self.unrestricted_url.write().await = url.to_string();
    }

    /// Make every call of this kind fail.
    pub async fn set_failure(&self, call: DebridCall) {
        self.failures.write().await.insert(call);
    }

    pub async fn recorded_calls(&self) -> DebridApiCalls {
        self.calls.read().await.clone()
    }

    async fn enter(&self, call: DebridCall, credential: &str) -> Result<(), DebridError> {
        {
            let mut calls = self.calls.write().await;
            if !calls.credentials_seen.iter().any(|c| c == credential) {
                calls.credentials_seen.push(credential.to_string());
            }
        }

        if self.failures.read().await.contains(&call) {
            return Err(DebridError::ApiError(format!("HTTP 503: {:?} unavailable", call)));
        }
        Ok(())
    }
}

#[async_trait]
impl DebridTorrentApi for MockDebridApi {
    async fn add_magnet(&self, magnet: &str, credential: &str) -> Result<String, DebridError> {
        self.enter(DebridCall::AddMagnet, credential).await?;

        let mut calls = self.calls.write().await;
        calls.added.push(magnet.to_string());
        Ok(format!("mock-torrent-{}", calls.added.len()))
    }

    async fn torrent_info(
        &self,
        _torrent_id: &str,
        credential: &str,
    ) -> Result<RemoteTorrentInfo, DebridError> {
        self.calls.write().await.info_calls += 1;
        self.enter(DebridCall::TorrentInfo, credential).await?;

        if let Some(info) = self.info_queue.write().await.pop_front() {
            return Ok(info);
        }
        self.default_info
            .read()
            .await
            .clone()
            .ok_or_else(|| DebridError::ApiError("HTTP 404: unknown torrent".to_string()))
    }

    async fn select_files(
        &self,
        torrent_id: &str,
        selection: &FileSelection,
        credential: &str,
    ) -> Result<(), DebridError> {
        self.enter(DebridCall::SelectFiles, credential).await?;

        self.calls.write().await.select_files.push((
            torrent_id.to_string(),
            selection.as_form_value().to_string(),
        ));
        Ok(())
    }

    async fn unrestrict_link(&self, link: &str, credential: &str) -> Result<String, DebridError> {
        self.enter(DebridCall::Unrestrict, credential).await?;

        self.calls.write().await.unrestricted.push(link.to_string());
        Ok(self.unrestricted_url.read().await.clone())
    }
}
