//! Shared debrid provider types.

use std::fmt;
use std::str::FromStr;

use reqwest::{RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Debrid services with an instant-availability API.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum DebridProvider {
    #[default]
    RealDebrid,
    AllDebrid,
    Premiumize,
}

impl DebridProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebridProvider::RealDebrid => "real_debrid",
            DebridProvider::AllDebrid => "all_debrid",
            DebridProvider::Premiumize => "premiumize",
        }
    }
}

impl fmt::Display for DebridProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DebridProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "real_debrid" | "realdebrid" | "rd" => Ok(DebridProvider::RealDebrid),
            "all_debrid" | "alldebrid" | "ad" => Ok(DebridProvider::AllDebrid),
            "premiumize" | "pm" => Ok(DebridProvider::Premiumize),
            other => Err(format!("unknown debrid provider: {}", other)),
        }
    }
}

/// Errors from a debrid provider API.
#[derive(Debug, Error)]
pub enum DebridError {
    #[error("Provider connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Provider rejected credential: {0}")]
    AuthenticationFailed(String),

    #[error("Provider API error: {0}")]
    ApiError(String),

    #[error("Failed to parse provider response: {0}")]
    ParseError(String),

    #[error("Request timeout")]
    Timeout,
}

pub(crate) fn classify_request_error(e: reqwest::Error) -> DebridError {
    if e.is_timeout() {
        DebridError::Timeout
    } else if e.is_connect() {
        DebridError::ConnectionFailed(e.to_string())
    } else {
        DebridError::ApiError(e.to_string())
    }
}

/// Send a request and return the status and body of a successful response.
pub(crate) async fn send_request(request: RequestBuilder) -> Result<(StatusCode, String), DebridError> {
    let response = request.send().await.map_err(classify_request_error)?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = format!(
            "HTTP {}: {}",
            status,
            body.chars().take(200).collect::<String>()
        );
        return Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                DebridError::AuthenticationFailed(message)
            }
            _ => DebridError::ApiError(message),
        });
    }

    let body = response.text().await.map_err(classify_request_error)?;
    Ok((status, body))
}

/// Deserialize a JSON body, mapping failures to `ParseError`.
pub(crate) fn parse_json<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, DebridError> {
    serde_json::from_str(body)
        .map_err(|e| DebridError::ParseError(format!("Failed to parse response: {}", e)))
}
