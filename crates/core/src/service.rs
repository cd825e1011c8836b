//! The `CacheScout` service: the capabilities exposed to callers.
//!
//! Every capability degrades instead of failing. Source and provider errors
//! are logged and become empty results; link resolution reports a missing
//! link with its reason.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::availability::{
    AllDebridChecker, AvailabilityChecker, PremiumizeChecker, RealDebridChecker,
};
use crate::config::Config;
use crate::debrid::DebridProvider;
use crate::magnet::InfoHash;
use crate::metrics;
use crate::ranking::{merge_cached, CachedResult, RankingStrategy};
use crate::resolver::{LinkResolution, LinkResolver, RealDebridTorrentApi};
use crate::searcher::{
    Candidate, LeetxAdapter, PirateBayAdapter, SourceAdapter, SourceQuery, TorrentioAdapter,
    YtsAdapter,
};

const DEFAULT_PER_SOURCE_LIMIT: usize = 10;
const DEFAULT_TITLE_SEARCH_LIMIT: usize = 15;

/// Torrent search across sources with debrid cache lookup and link
/// resolution.
pub struct CacheScout {
    aggregator: Arc<dyn SourceAdapter>,
    scrapers: Vec<Arc<dyn SourceAdapter>>,
    checkers: HashMap<DebridProvider, Arc<dyn AvailabilityChecker>>,
    resolver: LinkResolver,
    per_source_limit: usize,
    title_search_limit: usize,
}

impl CacheScout {
    /// Create a service with an aggregator and a resolver. Scrapers and
    /// checkers are added with the builder methods.
    pub fn new(aggregator: Arc<dyn SourceAdapter>, resolver: LinkResolver) -> Self {
        Self {
            aggregator,
            scrapers: Vec::new(),
            checkers: HashMap::new(),
            resolver,
            per_source_limit: DEFAULT_PER_SOURCE_LIMIT,
            title_search_limit: DEFAULT_TITLE_SEARCH_LIMIT,
        }
    }

    /// Add a scraper. Scrapers are queried in the order they are added.
    pub fn with_scraper(mut self, scraper: Arc<dyn SourceAdapter>) -> Self {
        self.scrapers.push(scraper);
        self
    }

    /// Register the checker for its provider, replacing any previous one.
    pub fn with_checker(mut self, checker: Arc<dyn AvailabilityChecker>) -> Self {
        self.checkers.insert(checker.provider(), checker);
        self
    }

    pub fn with_limits(mut self, per_source_limit: usize, title_search_limit: usize) -> Self {
        self.per_source_limit = per_source_limit;
        self.title_search_limit = title_search_limit;
        self
    }

    /// Wire the HTTP adapters, checkers and resolver described by `config`.
    pub fn from_config(config: &Config) -> Self {
        let sources = &config.sources;
        let debrid = &config.debrid;
        let user_agent = &sources.user_agent;

        let resolver = LinkResolver::new(
            Arc::new(RealDebridTorrentApi::new(&debrid.real_debrid)),
            &config.resolver,
        );

        Self::new(
            Arc::new(TorrentioAdapter::new(&sources.torrentio, user_agent)),
            resolver,
        )
        .with_scraper(Arc::new(YtsAdapter::new(&sources.yts, user_agent)))
        .with_scraper(Arc::new(LeetxAdapter::new(&sources.leetx, user_agent)))
        .with_scraper(Arc::new(PirateBayAdapter::new(&sources.piratebay, user_agent)))
        .with_checker(Arc::new(RealDebridChecker::new(&debrid.real_debrid)))
        .with_checker(Arc::new(AllDebridChecker::new(&debrid.all_debrid)))
        .with_checker(Arc::new(PremiumizeChecker::new(&debrid.premiumize)))
        .with_limits(sources.per_source_limit, sources.title_search_limit)
    }

    /// Providers with a registered checker.
    pub fn providers(&self) -> Vec<DebridProvider> {
        let mut providers: Vec<_> = self.checkers.keys().copied().collect();
        providers.sort_by_key(|p| p.as_str());
        providers
    }

    /// Names of the scrapers, in query order.
    pub fn scraper_names(&self) -> Vec<String> {
        self.scrapers.iter().map(|s| s.name().to_string()).collect()
    }

    /// Free-text search across every scraper, most seeded first.
    ///
    /// `limit` applies per source and defaults to the configured
    /// per-source limit.
    pub async fn search_all_sources(&self, query: &str, limit: Option<usize>) -> Vec<Candidate> {
        let query = SourceQuery::text(query.trim())
            .with_limit(limit.unwrap_or(self.per_source_limit));
        self.scrape(query).await
    }

    /// Movie search across every scraper (`"{title} {year}"`).
    pub async fn search_movie(&self, title: &str, year: Option<u32>) -> Vec<Candidate> {
        let query = SourceQuery::movie(title.trim(), year).with_limit(self.title_search_limit);
        self.scrape(query).await
    }

    /// TV search across every scraper (`"{title} SxxEyy"` or `"{title} Sxx"`).
    pub async fn search_tv(
        &self,
        title: &str,
        season: Option<u32>,
        episode: Option<u32>,
    ) -> Vec<Candidate> {
        let query =
            SourceQuery::tv(title.trim(), season, episode).with_limit(self.title_search_limit);
        self.scrape(query).await
    }

    /// Aggregator candidates that `provider` holds in cache, best quality
    /// first.
    pub async fn search_cached(
        &self,
        request: &SourceQuery,
        provider: DebridProvider,
        credential: &str,
    ) -> Vec<CachedResult> {
        let has_identifier = !request.text.trim().is_empty()
            || request.imdb_id.as_deref().is_some_and(|id| !id.trim().is_empty());
        if !has_identifier {
            debug!("Cached search without title or id");
            return Vec::new();
        }

        let Some(checker) = self.checkers.get(&provider) else {
            warn!(provider = %provider, "No availability checker configured");
            return Vec::new();
        };

        let candidates = self.search_source(self.aggregator.as_ref(), request).await;
        let hashes: Vec<InfoHash> = candidates
            .iter()
            .filter_map(|c| c.info_hash.clone())
            .collect();
        if hashes.is_empty() {
            info!(query = %request.search_text(), "No hashes found");
            return Vec::new();
        }

        let span = info_span!("availability_check", provider = %provider);
        let availability = match checker
            .check_availability(&hashes, credential)
            .instrument(span)
            .await
        {
            Ok(map) => {
                metrics::AVAILABILITY_CHECKS
                    .with_label_values(&[provider.as_str(), "success"])
                    .inc();
                map
            }
            Err(e) => {
                metrics::AVAILABILITY_CHECKS
                    .with_label_values(&[provider.as_str(), "error"])
                    .inc();
                warn!(provider = %provider, error = %e, "Availability check failed");
                return Vec::new();
            }
        };

        let mut results = merge_cached(candidates, &availability);
        RankingStrategy::ByQuality.sort(&mut results);

        info!(
            provider = %provider,
            checked = hashes.len(),
            cached = results.len(),
            "Cached search complete"
        );
        results
    }

    /// Add `info_hash` to the provider and resolve a direct download link.
    pub async fn check_and_resolve(
        &self,
        info_hash: &str,
        credential: &str,
        file_id: Option<&str>,
    ) -> LinkResolution {
        let span = info_span!("link_resolution", info_hash = %info_hash);
        self.resolver
            .resolve(info_hash, credential, file_id)
            .instrument(span)
            .await
    }

    async fn scrape(&self, query: SourceQuery) -> Vec<Candidate> {
        if query.text.is_empty() {
            debug!("Empty search query");
            return Vec::new();
        }

        let per_source = join_all(
            self.scrapers
                .iter()
                .map(|scraper| self.search_source(scraper.as_ref(), &query)),
        )
        .await;

        let mut results: Vec<Candidate> = per_source.into_iter().flatten().collect();
        RankingStrategy::BySeeders.sort(&mut results);

        info!(
            query = %query.search_text(),
            sources = self.scrapers.len(),
            results = results.len(),
            "Search complete"
        );
        results
    }

    /// Query one source, turning failures into an empty list.
    async fn search_source(&self, source: &dyn SourceAdapter, query: &SourceQuery) -> Vec<Candidate> {
        let name = source.name().to_string();
        let span = info_span!("source_search", source = %name);

        match source.search(query).instrument(span).await {
            Ok(candidates) => {
                metrics::SOURCE_SEARCHES
                    .with_label_values(&[name.as_str(), "success"])
                    .inc();
                metrics::SOURCE_CANDIDATES
                    .with_label_values(&[name.as_str()])
                    .observe(candidates.len() as f64);
                debug!(source = %name, results = candidates.len(), "Source returned");
                candidates
            }
            Err(e) => {
                metrics::SOURCE_SEARCHES
                    .with_label_values(&[name.as_str(), "error"])
                    .inc();
                warn!(source = %name, error = %e, "Source search failed");
                Vec::new()
            }
        }
    }
}
