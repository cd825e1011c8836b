use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Root configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub debrid: DebridConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Base URL and timeout of one upstream endpoint.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct EndpointConfig {
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl EndpointConfig {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs,
        }
    }
}

/// Torrent source configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourcesConfig {
    #[serde(default = "default_torrentio")]
    pub torrentio: EndpointConfig,
    #[serde(default = "default_yts")]
    pub yts: EndpointConfig,
    #[serde(default = "default_leetx")]
    pub leetx: EndpointConfig,
    #[serde(default = "default_piratebay")]
    pub piratebay: EndpointConfig,
    /// User agent sent to scraped sites
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Results per source for free-text searches (default: 10)
    #[serde(default = "default_per_source_limit")]
    pub per_source_limit: usize,
    /// Results per source for movie and TV searches (default: 15)
    #[serde(default = "default_title_search_limit")]
    pub title_search_limit: usize,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            torrentio: default_torrentio(),
            yts: default_yts(),
            leetx: default_leetx(),
            piratebay: default_piratebay(),
            user_agent: default_user_agent(),
            per_source_limit: default_per_source_limit(),
            title_search_limit: default_title_search_limit(),
        }
    }
}

fn default_torrentio() -> EndpointConfig {
    EndpointConfig::new("https://torrentio.strem.fun", 15)
}

fn default_yts() -> EndpointConfig {
    EndpointConfig::new("https://yts.mx/api/v2", 10)
}

fn default_leetx() -> EndpointConfig {
    EndpointConfig::new("https://1337x.to", 10)
}

fn default_piratebay() -> EndpointConfig {
    EndpointConfig::new("https://thepiratebay.org", 10)
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36".to_string()
}

fn default_per_source_limit() -> usize {
    10
}

fn default_title_search_limit() -> usize {
    15
}

/// Debrid provider configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DebridConfig {
    #[serde(default)]
    pub real_debrid: RealDebridConfig,
    #[serde(default)]
    pub all_debrid: AllDebridConfig,
    #[serde(default)]
    pub premiumize: PremiumizeConfig,
}

/// Real-Debrid configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RealDebridConfig {
    #[serde(default = "default_real_debrid_url")]
    pub base_url: String,
    /// Timeout for instant-availability checks (default: 15)
    #[serde(default = "default_availability_timeout")]
    pub timeout_secs: u64,
    /// Timeout for each torrent lifecycle call (default: 10)
    #[serde(default = "default_lifecycle_timeout")]
    pub lifecycle_timeout_secs: u64,
}

impl Default for RealDebridConfig {
    fn default() -> Self {
        Self {
            base_url: default_real_debrid_url(),
            timeout_secs: default_availability_timeout(),
            lifecycle_timeout_secs: default_lifecycle_timeout(),
        }
    }
}

fn default_real_debrid_url() -> String {
    "https://api.real-debrid.com/rest/1.0".to_string()
}

/// AllDebrid configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AllDebridConfig {
    #[serde(default = "default_all_debrid_url")]
    pub base_url: String,
    /// Agent name reported to the AllDebrid API
    #[serde(default = "default_agent")]
    pub agent: String,
    #[serde(default = "default_availability_timeout")]
    pub timeout_secs: u64,
}

impl Default for AllDebridConfig {
    fn default() -> Self {
        Self {
            base_url: default_all_debrid_url(),
            agent: default_agent(),
            timeout_secs: default_availability_timeout(),
        }
    }
}

fn default_all_debrid_url() -> String {
    "https://api.alldebrid.com/v4".to_string()
}

fn default_agent() -> String {
    "cachescout".to_string()
}

/// Premiumize configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PremiumizeConfig {
    #[serde(default = "default_premiumize_url")]
    pub base_url: String,
    #[serde(default = "default_availability_timeout")]
    pub timeout_secs: u64,
}

impl Default for PremiumizeConfig {
    fn default() -> Self {
        Self {
            base_url: default_premiumize_url(),
            timeout_secs: default_availability_timeout(),
        }
    }
}

fn default_premiumize_url() -> String {
    "https://www.premiumize.me/api".to_string()
}

fn default_availability_timeout() -> u64 {
    15
}

fn default_lifecycle_timeout() -> u64 {
    10
}

/// Link resolution polling configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Delay between status polls in milliseconds (default: 1000)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Maximum number of status polls (default: 10)
    #[serde(default = "default_max_polls")]
    pub max_polls: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            max_polls: default_max_polls(),
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_max_polls() -> u32 {
    10
}
