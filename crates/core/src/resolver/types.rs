//! Types for the provider torrent lifecycle.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::debrid::DebridError;

/// Remote torrent status, normalized from the provider vocabulary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RemoteStatus {
    Queued,
    WaitingFileSelection,
    Downloading,
    Downloaded,
    Error,
    Unknown,
}

impl RemoteStatus {
    /// Map a Real-Debrid status string.
    pub fn from_provider(status: &str) -> Self {
        match status {
            "queued" => RemoteStatus::Queued,
            "waiting_files_selection" => RemoteStatus::WaitingFileSelection,
            "downloading" => RemoteStatus::Downloading,
            "downloaded" => RemoteStatus::Downloaded,
            "magnet_error" | "error" | "virus" | "dead" => RemoteStatus::Error,
            _ => RemoteStatus::Unknown,
        }
    }

    /// Whether polling should continue.
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            RemoteStatus::Queued | RemoteStatus::WaitingFileSelection | RemoteStatus::Downloading
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteStatus::Queued => "queued",
            RemoteStatus::WaitingFileSelection => "waiting_file_selection",
            RemoteStatus::Downloading => "downloading",
            RemoteStatus::Downloaded => "downloaded",
            RemoteStatus::Error => "error",
            RemoteStatus::Unknown => "unknown",
        }
    }
}

/// One file of a remote torrent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoteFile {
    pub id: u64,
    pub path: String,
    pub bytes: u64,
}

/// Status snapshot of a remote torrent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoteTorrentInfo {
    pub status: RemoteStatus,
    #[serde(default)]
    pub files: Vec<RemoteFile>,
    #[serde(default)]
    pub links: Vec<String>,
}

/// Files to keep from a remote torrent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSelection {
    /// Comma-separated provider file ids.
    Files(String),
    All,
}

impl FileSelection {
    /// Value of the provider's `files` form field.
    pub fn as_form_value(&self) -> &str {
        match self {
            FileSelection::Files(ids) => ids,
            FileSelection::All => "all",
        }
    }
}

/// Bearer-authenticated torrent lifecycle calls of a debrid provider.
#[async_trait]
pub trait DebridTorrentApi: Send + Sync {
    /// Submit a magnet, returning the remote torrent id.
    async fn add_magnet(&self, magnet: &str, credential: &str) -> Result<String, DebridError>;

    async fn torrent_info(
        &self,
        torrent_id: &str,
        credential: &str,
    ) -> Result<RemoteTorrentInfo, DebridError>;

    async fn select_files(
        &self,
        torrent_id: &str,
        selection: &FileSelection,
        credential: &str,
    ) -> Result<(), DebridError>;

    /// Convert a hoster link into a direct download URL.
    async fn unrestrict_link(&self, link: &str, credential: &str) -> Result<String, DebridError>;
}

/// Workflow progress, kept for the caller's inspection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkResolutionState {
    pub remote_torrent_id: Option<String>,
    pub status: Option<RemoteStatus>,
    pub selected_file_id: Option<String>,
    pub resolved_link: Option<String>,
}

/// Why a resolution produced no link.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoLinkReason {
    InvalidHash,
    SubmitFailed,
    InfoFailed,
    SelectFailed,
    PollFailed,
    UnexpectedStatus,
    NoLinks,
    UnrestrictFailed,
    PollBudgetExhausted,
}

impl NoLinkReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoLinkReason::InvalidHash => "invalid_hash",
            NoLinkReason::SubmitFailed => "submit_failed",
            NoLinkReason::InfoFailed => "info_failed",
            NoLinkReason::SelectFailed => "select_failed",
            NoLinkReason::PollFailed => "poll_failed",
            NoLinkReason::UnexpectedStatus => "unexpected_status",
            NoLinkReason::NoLinks => "no_links",
            NoLinkReason::UnrestrictFailed => "unrestrict_failed",
            NoLinkReason::PollBudgetExhausted => "poll_budget_exhausted",
        }
    }
}

/// Result of one resolution run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkResolution {
    pub state: LinkResolutionState,
    /// Status polls after file selection.
    pub polls: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<NoLinkReason>,
}

impl LinkResolution {
    /// The direct download URL, if one was resolved.
    pub fn link(&self) -> Option<&str> {
        self.state.resolved_link.as_deref()
    }

    pub fn outcome(&self) -> &'static str {
        match self.failure {
            Some(reason) => reason.as_str(),
            None => "resolved",
        }
    }
}
