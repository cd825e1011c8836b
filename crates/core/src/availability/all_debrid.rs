//! AllDebrid instant availability.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::AllDebridConfig;
use crate::debrid::{parse_json, send_request, DebridError, DebridProvider};
use crate::magnet::InfoHash;

use super::{capped, insert_cached, AvailabilityChecker, AvailabilityMap, CachedFile};

/// Checks `/magnet/instant` with an array of magnet URIs and an API key.
pub struct AllDebridChecker {
    client: Client,
    base_url: String,
    agent: String,
}

impl AllDebridChecker {
    pub fn new(config: &AllDebridConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            agent: config.agent.clone(),
        }
    }

    fn build_params(&self, hashes: &[InfoHash], credential: &str) -> Vec<(String, String)> {
        let mut params = vec![
            ("agent".to_string(), self.agent.clone()),
            ("apikey".to_string(), credential.to_string()),
        ];
        params.extend(
            hashes
                .iter()
                .enumerate()
                .map(|(i, hash)| (format!("magnets[{}]", i), hash.magnet_uri())),
        );
        params
    }
}

#[derive(Debug, Deserialize)]
struct AdResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    data: Option<AdData>,
    #[serde(default)]
    error: Option<AdError>,
}

#[derive(Debug, Deserialize)]
struct AdError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct AdData {
    #[serde(default)]
    magnets: Vec<AdMagnet>,
}

#[derive(Debug, Deserialize)]
struct AdMagnet {
    #[serde(default)]
    hash: String,
    #[serde(default)]
    instant: bool,
    #[serde(default)]
    files: Vec<AdFile>,
}

/// A file (`n`, `s`) or a directory (`n`, `e`) in an AllDebrid file tree.
#[derive(Debug, Deserialize)]
struct AdFile {
    #[serde(default)]
    n: String,
    #[serde(default)]
    s: Option<u64>,
    #[serde(default)]
    e: Vec<AdFile>,
}

/// Flatten a file tree into `dir/name` paths. Ids are positions in the
/// flattened list.
fn flatten_files(files: &[AdFile]) -> Vec<CachedFile> {
    fn walk(files: &[AdFile], prefix: &str, out: &mut Vec<CachedFile>) {
        for file in files {
            let path = if prefix.is_empty() {
                file.n.clone()
            } else {
                format!("{}/{}", prefix, file.n)
            };

            if file.e.is_empty() {
                let id = out.len().to_string();
                out.push(CachedFile::new(id, path, file.s.unwrap_or(0)));
            } else {
                walk(&file.e, &path, out);
            }
        }
    }

    let mut out = Vec::new();
    walk(files, "", &mut out);
    out
}

pub(crate) fn parse_availability(
    body: &str,
    requested: &[InfoHash],
) -> Result<AvailabilityMap, DebridError> {
    let response: AdResponse = parse_json(body)?;

    if response.status != "success" {
        let error = response.error.unwrap_or(AdError {
            code: String::new(),
            message: format!("status {}", response.status),
        });
        let message = format!("{} {}", error.code, error.message).trim().to_string();
        return Err(if error.code.starts_with("AUTH_") {
            DebridError::AuthenticationFailed(message)
        } else {
            DebridError::ApiError(message)
        });
    }

    let requested: HashSet<&InfoHash> = requested.iter().collect();
    let mut map = AvailabilityMap::new();

    for magnet in response.data.map(|d| d.magnets).unwrap_or_default() {
        if !magnet.instant {
            continue;
        }
        let Some(info_hash) = InfoHash::parse(&magnet.hash).filter(|h| requested.contains(h))
        else {
            continue;
        };
        insert_cached(&mut map, info_hash, vec![flatten_files(&magnet.files)]);
    }

    Ok(map)
}

#[async_trait]
impl AvailabilityChecker for AllDebridChecker {
    fn provider(&self) -> DebridProvider {
        DebridProvider::AllDebrid
    }

    async fn check_availability(
        &self,
        hashes: &[InfoHash],
        credential: &str,
    ) -> Result<AvailabilityMap, DebridError> {
        let hashes = capped(hashes);
        if hashes.is_empty() {
            return Ok(AvailabilityMap::new());
        }

        debug!(provider = "all_debrid", hashes = hashes.len(), "Checking instant availability");
        let url = format!("{}/magnet/instant", self.base_url);
        let request = self
            .client
            .get(&url)
            .query(&self.build_params(hashes, credential));
        let (_, body) = send_request(request).await?;

        let map = parse_availability(&body, hashes)?;
        debug!(provider = "all_debrid", cached = map.len(), "Availability check complete");
        Ok(map)
    }
}
