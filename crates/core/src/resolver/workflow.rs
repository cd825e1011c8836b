use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::availability::is_video_file;
use crate::config::ResolverConfig;
use crate::magnet::InfoHash;
use crate::metrics;

use super::{
    DebridTorrentApi, FileSelection, LinkResolution, LinkResolutionState, NoLinkReason,
    RemoteFile, RemoteStatus, Sleeper, TokioSleeper,
};

/// Runs the submit, select, poll and unrestrict sequence for one hash.
///
/// Holds no per-run state, so one resolver can serve concurrent callers.
pub struct LinkResolver {
    api: Arc<dyn DebridTorrentApi>,
    sleeper: Arc<dyn Sleeper>,
    poll_interval: Duration,
    max_polls: u32,
}

impl LinkResolver {
    pub fn new(api: Arc<dyn DebridTorrentApi>, config: &ResolverConfig) -> Self {
        Self {
            api,
            sleeper: Arc::new(TokioSleeper),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            max_polls: config.max_polls,
        }
    }

    /// Replace the sleeper used between polls.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn max_polls(&self) -> u32 {
        self.max_polls
    }

    /// Resolve `info_hash` to a direct download URL.
    ///
    /// Never fails: every error ends the run with `failure` set and no link.
    /// Remote torrents created before a failure are left in place.
    pub async fn resolve(
        &self,
        info_hash: &str,
        credential: &str,
        file_id: Option<&str>,
    ) -> LinkResolution {
        let mut run = Run {
            state: LinkResolutionState::default(),
            polls: 0,
        };

        let failure = self.drive(&mut run, info_hash, credential, file_id).await.err();
        let resolution = LinkResolution {
            state: run.state,
            polls: run.polls,
            failure,
        };

        metrics::LINK_RESOLUTIONS
            .with_label_values(&[resolution.outcome()])
            .inc();
        metrics::RESOLVE_POLLS
            .with_label_values(&[])
            .observe(resolution.polls as f64);

        match resolution.failure {
            None => info!(polls = resolution.polls, "Link resolved"),
            Some(reason) => info!(
                polls = resolution.polls,
                reason = reason.as_str(),
                "No link resolved"
            ),
        }

        resolution
    }

    async fn drive(
        &self,
        run: &mut Run,
        info_hash: &str,
        credential: &str,
        file_id: Option<&str>,
    ) -> Result<(), NoLinkReason> {
        let hash = InfoHash::parse(info_hash).ok_or(NoLinkReason::InvalidHash)?;

        let torrent_id = self
            .api
            .add_magnet(&hash.magnet_uri(), credential)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to submit magnet");
                NoLinkReason::SubmitFailed
            })?;
        run.state.remote_torrent_id = Some(torrent_id.clone());

        let info = self
            .api
            .torrent_info(&torrent_id, credential)
            .await
            .map_err(|e| {
                warn!(torrent_id = %torrent_id, error = %e, "Failed to fetch torrent info");
                NoLinkReason::InfoFailed
            })?;
        run.state.status = Some(info.status);

        let selection = match file_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => FileSelection::Files(id.to_string()),
            None => largest_video_file(&info.files)
                .map(|file| FileSelection::Files(file.id.to_string()))
                .unwrap_or(FileSelection::All),
        };
        run.state.selected_file_id = Some(selection.as_form_value().to_string());

        self.api
            .select_files(&torrent_id, &selection, credential)
            .await
            .map_err(|e| {
                warn!(torrent_id = %torrent_id, error = %e, "Failed to select files");
                NoLinkReason::SelectFailed
            })?;

        while run.polls < self.max_polls {
            let info = self
                .api
                .torrent_info(&torrent_id, credential)
                .await
                .map_err(|e| {
                    warn!(torrent_id = %torrent_id, error = %e, "Status poll failed");
                    NoLinkReason::PollFailed
                })?;
            run.polls += 1;
            run.state.status = Some(info.status);

            if info.status.is_pending() {
                debug!(
                    torrent_id = %torrent_id,
                    poll = run.polls,
                    status = info.status.as_str(),
                    "Torrent not ready"
                );
                self.sleeper.sleep(self.poll_interval).await;
                continue;
            }

            if info.status != RemoteStatus::Downloaded {
                debug!(torrent_id = %torrent_id, status = info.status.as_str(), "Unexpected status");
                return Err(NoLinkReason::UnexpectedStatus);
            }

            let link = info.links.first().ok_or(NoLinkReason::NoLinks)?;
            let url = self
                .api
                .unrestrict_link(link, credential)
                .await
                .map_err(|e| {
                    warn!(torrent_id = %torrent_id, error = %e, "Failed to unrestrict link");
                    NoLinkReason::UnrestrictFailed
                })?;
            run.state.resolved_link = Some(url);
            return Ok(());
        }

        Err(NoLinkReason::PollBudgetExhausted)
    }
}

struct Run {
    state: LinkResolutionState,
    polls: u32,
}

/// Largest file with a video extension; ties keep the first.
fn largest_video_file(files: &[RemoteFile]) -> Option<&RemoteFile> {
    files
        .iter()
        .filter(|file| is_video_file(&file.path))
        .fold(None, |best: Option<&RemoteFile>, file| match best {
            Some(current) if current.bytes >= file.bytes => Some(current),
            _ => Some(file),
        })
}
