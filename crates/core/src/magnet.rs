//! Info hashes and magnet URIs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Length of a hex-encoded BitTorrent v1 info hash.
pub const INFO_HASH_LEN: usize = 40;

/// A validated torrent info hash (40 lowercase hex characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InfoHash(String);

impl InfoHash {
    /// Parse an info hash, normalizing to lowercase.
    ///
    /// Returns `None` unless the input is exactly 40 hex characters.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.len() == INFO_HASH_LEN && raw.chars().all(|c| c.is_ascii_hexdigit()) {
            Some(Self(raw.to_ascii_lowercase()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The bare magnet URI for this hash.
    pub fn magnet_uri(&self) -> String {
        format!("magnet:?xt=urn:btih:{}", self.0)
    }
}

impl fmt::Display for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for InfoHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for InfoHash {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        InfoHash::parse(&value).ok_or_else(|| format!("invalid info hash: {}", value))
    }
}

impl From<InfoHash> for String {
    fn from(hash: InfoHash) -> Self {
        hash.0
    }
}

/// Extract the `xt=urn:btih:` value from a magnet URI (lowercased, unvalidated).
pub fn extract_hash_from_magnet(magnet: &str) -> Option<String> {
    let (_, params) = magnet.split_once('?')?;

    params
        .split('&')
        .find_map(|param| param.strip_prefix("xt=urn:btih:"))
        .map(|hash| hash.to_lowercase())
}

/// Recover a validated info hash from a magnet URI, if it carries a hex one.
pub fn info_hash_from_magnet(magnet: &str) -> Option<InfoHash> {
    extract_hash_from_magnet(magnet).and_then(|h| InfoHash::parse(&h))
}
