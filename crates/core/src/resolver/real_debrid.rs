//! Real-Debrid torrent lifecycle client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::config::RealDebridConfig;
use crate::debrid::{parse_json, send_request, DebridError};

use super::{DebridTorrentApi, FileSelection, RemoteFile, RemoteStatus, RemoteTorrentInfo};

/// Real-Debrid `/torrents` and `/unrestrict` endpoints.
pub struct RealDebridTorrentApi {
    client: Client,
    base_url: String,
}

impl RealDebridTorrentApi {
    pub fn new(config: &RealDebridConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.lifecycle_timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AddMagnetResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct TorrentInfoResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    files: Vec<TorrentFile>,
    #[serde(default)]
    links: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TorrentFile {
    id: u64,
    #[serde(default)]
    path: String,
    #[serde(default)]
    bytes: u64,
}

#[derive(Debug, Deserialize)]
struct UnrestrictResponse {
    download: Option<String>,
}

pub(crate) fn parse_torrent_info(body: &str) -> Result<RemoteTorrentInfo, DebridError> {
    let info: TorrentInfoResponse = parse_json(body)?;
    Ok(RemoteTorrentInfo {
        status: RemoteStatus::from_provider(&info.status),
        files: info
            .files
            .into_iter()
            .map(|f| RemoteFile {
                id: f.id,
                path: f.path,
                bytes: f.bytes,
            })
            .collect(),
        links: info.links,
    })
}

#[async_trait]
impl DebridTorrentApi for RealDebridTorrentApi {
    async fn add_magnet(&self, magnet: &str, credential: &str) -> Result<String, DebridError> {
        let url = format!("{}/torrents/addMagnet", self.base_url);
        let request = self
            .client
            .post(&url)
            .bearer_auth(credential)
            .form(&[("magnet", magnet)]);

        let (status, body) = send_request(request).await?;
        if status != StatusCode::CREATED {
            return Err(DebridError::ApiError(format!(
                "addMagnet returned HTTP {}",
                status
            )));
        }

        let added: AddMagnetResponse = parse_json(&body)?;
        debug!(torrent_id = %added.id, "Magnet added");
        Ok(added.id)
    }

    async fn torrent_info(
        &self,
        torrent_id: &str,
        credential: &str,
    ) -> Result<RemoteTorrentInfo, DebridError> {
        let url = format!(
            "{}/torrents/info/{}",
            self.base_url,
            urlencoding::encode(torrent_id)
        );
        let (_, body) = send_request(self.client.get(&url).bearer_auth(credential)).await?;
        parse_torrent_info(&body)
    }

    async fn select_files(
        &self,
        torrent_id: &str,
        selection: &FileSelection,
        credential: &str,
    ) -> Result<(), DebridError> {
        let url = format!(
            "{}/torrents/selectFiles/{}",
            self.base_url,
            urlencoding::encode(torrent_id)
        );
        let request = self
            .client
            .post(&url)
            .bearer_auth(credential)
            .form(&[("files", selection.as_form_value())]);

        send_request(request).await?;
        Ok(())
    }

    async fn unrestrict_link(&self, link: &str, credential: &str) -> Result<String, DebridError> {
        let url = format!("{}/unrestrict/link", self.base_url);
        let request = self
            .client
            .post(&url)
            .bearer_auth(credential)
            .form(&[("link", link)]);

        let (_, body) = send_request(request).await?;
        let unrestricted: UnrestrictResponse = parse_json(&body)?;
        unrestricted
            .download
            .filter(|url| !url.is_empty())
            .ok_or_else(|| DebridError::ParseError("unrestrict response has no download".to_string()))
    }
}
