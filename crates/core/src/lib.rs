pub mod availability;
pub mod config;
pub mod debrid;
pub mod extract;
pub mod magnet;
pub mod metrics;
pub mod ranking;
pub mod resolver;
pub mod searcher;
pub mod service;
pub mod testing;

pub use availability::{
    AllDebridChecker, AvailabilityChecker, AvailabilityMap, CacheAvailability, CachedFile,
    PremiumizeChecker, RealDebridChecker, MAX_HASHES_PER_CHECK, VIDEO_EXTENSIONS,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, EndpointConfig,
};
pub use debrid::{DebridError, DebridProvider};
pub use extract::{extract_quality, extract_seeders, extract_size, extract_source, Quality};
pub use magnet::{extract_hash_from_magnet, info_hash_from_magnet, InfoHash};
pub use ranking::{merge_cached, CachedResult, RankingStrategy};
pub use resolver::{
    DebridTorrentApi, FileSelection, LinkResolution, LinkResolutionState, LinkResolver,
    NoLinkReason, RealDebridTorrentApi, RemoteStatus, RemoteTorrentInfo, Sleeper,
};
pub use searcher::{Candidate, ContentKind, SearchError, SourceAdapter, SourceQuery};
pub use service::CacheScout;
