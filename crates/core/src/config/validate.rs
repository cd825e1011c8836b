use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Every upstream base URL is http(s) and every timeout is positive
/// - Resolver polls at least once with a non-zero interval
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    let sources = &config.sources;
    let debrid = &config.debrid;
    let endpoints = [
        ("sources.torrentio", &sources.torrentio.base_url, sources.torrentio.timeout_secs),
        ("sources.yts", &sources.yts.base_url, sources.yts.timeout_secs),
        ("sources.leetx", &sources.leetx.base_url, sources.leetx.timeout_secs),
        ("sources.piratebay", &sources.piratebay.base_url, sources.piratebay.timeout_secs),
        ("debrid.real_debrid", &debrid.real_debrid.base_url, debrid.real_debrid.timeout_secs),
        ("debrid.all_debrid", &debrid.all_debrid.base_url, debrid.all_debrid.timeout_secs),
        ("debrid.premiumize", &debrid.premiumize.base_url, debrid.premiumize.timeout_secs),
    ];

    for (section, base_url, timeout_secs) in endpoints {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::ValidationError(format!(
                "{}.base_url must start with http:// or https://",
                section
            )));
        }
        if timeout_secs == 0 {
            return Err(ConfigError::ValidationError(format!(
                "{}.timeout_secs cannot be 0",
                section
            )));
        }
    }

    if debrid.real_debrid.lifecycle_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "debrid.real_debrid.lifecycle_timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.resolver.max_polls == 0 {
        return Err(ConfigError::ValidationError(
            "resolver.max_polls must be at least 1".to_string(),
        ));
    }

    if config.resolver.poll_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "resolver.poll_interval_ms cannot be 0".to_string(),
        ));
    }

    Ok(())
}
