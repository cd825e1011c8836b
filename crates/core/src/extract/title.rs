use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::Quality;

/// Size text returned when a title carries no size token.
pub const UNKNOWN_SIZE: &str = "Unknown";

/// Tracker names recognized in titles, in priority order.
pub const KNOWN_TRACKERS: &[&str] = &[
    "YTS",
    "EZTV",
    "RARBG",
    "1337X",
    "TPB",
    "THEPIRATEBAY",
    "RUTOR",
    "NYAA",
];

/// Release groups recognized in titles, checked after trackers.
pub const KNOWN_RELEASE_GROUPS: &[&str] = &[
    "YIFY", "SPARKS", "GECKOS", "AMIABLE", "RARBG", "FGT", "EVO",
];

static MARKED_SIZE: Lazy<Regex> = Lazy::new(|| Regex::new(r"💾\s*([\d.]+\s*[GMK]?B)").unwrap());
static GENERIC_SIZE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)([\d.]+\s*[GMK]B)").unwrap());
static MARKED_SEEDERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"👤\s*(\d+)").unwrap());
static GENERIC_SEEDERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*seeders?").unwrap());

/// Infer the quality tier. First matching rule wins, default 720p.
pub fn extract_quality(title: &str) -> Quality {
    let upper = title.to_uppercase();
    let has = |needle: &str| upper.contains(needle);

    if has("4K") || has("2160P") || has("UHD") {
        Quality::Uhd2160
    } else if has("1080P") || has("FULLHD") {
        Quality::FullHd1080
    } else if has("720P") || has("HD") {
        Quality::Hd720
    } else if has("480P") || has("HDTV") {
        Quality::Sd480
    } else {
        Quality::default()
    }
}

/// Extract a human-readable size such as `"2.1 GB"`, or [`UNKNOWN_SIZE`].
pub fn extract_size(title: &str) -> String {
    MARKED_SIZE
        .captures(title)
        .or_else(|| GENERIC_SIZE.captures(title))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN_SIZE.to_string())
}

/// Extract the seeder count, or 0.
pub fn extract_seeders(title: &str) -> u32 {
    [&*MARKED_SEEDERS, &*GENERIC_SEEDERS]
        .iter()
        .find_map(|re| {
            re.captures(title)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse().ok())
        })
        .unwrap_or(0)
}

/// Identify the tracker or release group named in a title.
///
/// Trackers are checked before release groups; `default` is returned when
/// neither list matches.
pub fn extract_source(title: &str, default: &str) -> String {
    let upper = title.to_uppercase();

    KNOWN_TRACKERS
        .iter()
        .chain(KNOWN_RELEASE_GROUPS)
        .find(|name| upper.contains(*name))
        .map(|name| name.to_string())
        .unwrap_or_else(|| default.to_string())
}
