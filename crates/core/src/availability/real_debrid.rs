//! Real-Debrid instant availability.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::RealDebridConfig;
use crate::debrid::{parse_json, send_request, DebridError, DebridProvider};
use crate::magnet::InfoHash;

use super::{capped, insert_cached, AvailabilityChecker, AvailabilityMap, CachedFile};

/// Checks `/torrents/instantAvailability/{h1}/{h2}/...` with bearer auth.
pub struct RealDebridChecker {
    client: Client,
    base_url: String,
}

impl RealDebridChecker {
    pub fn new(config: &RealDebridConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn build_url(&self, hashes: &[InfoHash]) -> String {
        let joined = hashes
            .iter()
            .map(InfoHash::as_str)
            .collect::<Vec<_>>()
            .join("/");
        format!("{}/torrents/instantAvailability/{}", self.base_url, joined)
    }
}

#[derive(Debug, Deserialize)]
struct RdFile {
    #[serde(default)]
    filename: String,
    #[serde(default)]
    filesize: u64,
}

/// Parse `{hash: {"rd": [{file_id: {filename, filesize}}]}}`.
///
/// Uncached hashes come back as an empty array or object and are skipped, as
/// are hashes that were not requested.
pub(crate) fn parse_availability(
    body: &str,
    requested: &[InfoHash],
) -> Result<AvailabilityMap, DebridError> {
    let value: Value = parse_json(body)?;
    let requested: HashSet<&InfoHash> = requested.iter().collect();

    let mut map = AvailabilityMap::new();
    let Some(entries) = value.as_object() else {
        return Ok(map);
    };

    for (key, entry) in entries {
        let Some(info_hash) = InfoHash::parse(key).filter(|h| requested.contains(h)) else {
            continue;
        };
        let Some(variants) = entry.get("rd").and_then(Value::as_array) else {
            continue;
        };

        let variants = variants
            .iter()
            .map(|variant| {
                variant
                    .as_object()
                    .map(|files| {
                        files
                            .iter()
                            .filter_map(|(id, file)| {
                                let file: RdFile = serde_json::from_value(file.clone()).ok()?;
                                Some(CachedFile::new(id.clone(), file.filename, file.filesize))
                            })
                            .collect()
                    })
                    .unwrap_or_default()
            })
            .collect();

        insert_cached(&mut map, info_hash, variants);
    }

    Ok(map)
}

#[async_trait]
impl AvailabilityChecker for RealDebridChecker {
    fn provider(&self) -> DebridProvider {
        DebridProvider::RealDebrid
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

        debug!(provider = "real_debrid", hashes = hashes.len(), "Checking instant availability");
        let request = self.client.get(self.build_url(hashes)).bearer_auth(credential);
        let (_, body) = send_request(request).await?;

        let map = parse_availability(&body, hashes)?;
        debug!(provider = "real_debrid", cached = map.len(), "Availability check complete");
        Ok(map)
    }
}
