use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse video resolution tier inferred from a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Quality {
    #[serde(rename = "480p")]
    Sd480,
    #[default]
    #[serde(rename = "720p")]
    Hd720,
    #[serde(rename = "1080p")]
    FullHd1080,
    #[serde(rename = "2160p")]
    Uhd2160,
}

impl Quality {
    /// Sort rank, best first (2160p = 0 .. 480p = 3).
    pub fn rank(&self) -> u32 {
        match self {
            Quality::Uhd2160 => 0,
            Quality::FullHd1080 => 1,
            Quality::Hd720 => 2,
            Quality::Sd480 => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Sd480 => "480p",
            Quality::Hd720 => "720p",
            Quality::FullHd1080 => "1080p",
            Quality::Uhd2160 => "2160p",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
