//! Premiumize cache check.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::PremiumizeConfig;
use crate::debrid::{parse_json, send_request, DebridError, DebridProvider};
use crate::magnet::InfoHash;

use super::{capped, insert_cached, AvailabilityChecker, AvailabilityMap, CachedFile};

/// Checks `/cache/check` with an `items[]` array of raw hashes.
///
/// Premiumize answers with arrays parallel to the request, one entry per
/// item, and exposes a single file per cached item.
pub struct PremiumizeChecker {
    client: Client,
    base_url: String,
}

impl PremiumizeChecker {
    pub fn new(config: &PremiumizeConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PmResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    response: Vec<bool>,
    #[serde(default)]
    filename: Vec<Option<String>>,
    #[serde(default)]
    filesize: Vec<Option<PmSize>>,
}

/// Sizes arrive as numbers or numeric strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PmSize {
    Number(u64),
    Text(String),
}

impl PmSize {
    fn bytes(&self) -> u64 {
        match self {
            PmSize::Number(n) => *n,
            PmSize::Text(s) => s.trim().parse().unwrap_or(0),
        }
    }
}

pub(crate) fn parse_availability(
    body: &str,
    requested: &[InfoHash],
) -> Result<AvailabilityMap, DebridError> {
    let response: PmResponse = parse_json(body)?;

    if response.status != "success" {
        let message = response
            .message
            .unwrap_or_else(|| format!("status {}", response.status));
        return Err(if message.to_lowercase().contains("apikey") {
            DebridError::AuthenticationFailed(message)
        } else {
            DebridError::ApiError(message)
        });
    }

    let mut map = AvailabilityMap::new();
    for (i, (info_hash, cached)) in requested.iter().zip(&response.response).enumerate() {
        if !cached {
            continue;
        }
        let filename = response.filename.get(i).cloned().flatten();
        let filesize = response
            .filesize
            .get(i)
            .and_then(|s| s.as_ref())
            .map(PmSize::bytes)
            .unwrap_or(0);

        let files = filename
            .filter(|name| !name.is_empty())
            .map(|name| vec![CachedFile::new("0", name, filesize)])
            .unwrap_or_default();
        insert_cached(&mut map, info_hash.clone(), vec![files]);
    }

    Ok(map)
}

#[async_trait]
impl AvailabilityChecker for PremiumizeChecker {
    fn provider(&self) -> DebridProvider {
        DebridProvider::Premiumize
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

        debug!(provider = "premiumize", hashes = hashes.len(), "Checking cache");
        let url = format!("{}/cache/check", self.base_url);
        let mut params = vec![("apikey", credential)];
        params.extend(hashes.iter().map(|h| ("items[]", h.as_str())));

        let (_, body) = send_request(self.client.get(&url).query(&params)).await?;

        let map = parse_availability(&body, hashes)?;
        debug!(provider = "premiumize", cached = map.len(), "Cache check complete");
        Ok(map)
    }
}
