//! Common test utilities for E2E testing with mocks.
//!
//! This module builds the real router over a `CacheScout` whose aggregator,
//! scrapers, checkers and torrent API are all mocks, so requests run
//! in-process without reaching any upstream.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use cachescout_core::{
    config::ResolverConfig,
    testing::{MockAvailabilityChecker, MockDebridApi, MockSourceAdapter, RecordingSleeper},
    CacheScout, Config, DebridProvider, LinkResolver,
};
use cachescout_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use cachescout_core::testing::fixtures;

/// Test fixture for E2E testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_search() {
///     let fixture = TestFixture::new();
///     fixture.yts.set_results(vec![fixtures::listing("Dune", 1, 10, "YTS")]).await;
///
///     let response = fixture.get("/api/v1/torrents/search?query=dune").await;
///     assert_eq!(response.body["count"], 1);
/// }
/// ```
pub struct TestFixture {
    pub router: Router,
    /// Aggregator behind the cached search
    pub torrentio: Arc<MockSourceAdapter>,
    pub yts: Arc<MockSourceAdapter>,
    pub leetx: Arc<MockSourceAdapter>,
    pub piratebay: Arc<MockSourceAdapter>,
    pub real_debrid: Arc<MockAvailabilityChecker>,
    pub all_debrid: Arc<MockAvailabilityChecker>,
    pub torrent_api: Arc<MockDebridApi>,
    pub sleeper: Arc<RecordingSleeper>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a fixture with empty mocks. Premiumize has no checker.
    pub fn new() -> Self {
        let torrentio = Arc::new(MockSourceAdapter::new("torrentio"));
        let yts = Arc::new(MockSourceAdapter::new("yts"));
        let leetx = Arc::new(MockSourceAdapter::new("1337x"));
        let piratebay = Arc::new(MockSourceAdapter::new("piratebay"));
        let real_debrid = Arc::new(MockAvailabilityChecker::new(DebridProvider::RealDebrid));
        let all_debrid = Arc::new(MockAvailabilityChecker::new(DebridProvider::AllDebrid));
        let torrent_api = Arc::new(MockDebridApi::new());
        let sleeper = Arc::new(RecordingSleeper::new());

        let mut config = Config::default();
        config.server.port = 0; // Not used for in-process testing

        let resolver = LinkResolver::new(torrent_api.clone(), &ResolverConfig::default())
            .with_sleeper(sleeper.clone());
        let scout = CacheScout::new(torrentio.clone(), resolver)
            .with_scraper(yts.clone())
            .with_scraper(leetx.clone())
            .with_scraper(piratebay.clone())
            .with_checker(real_debrid.clone())
            .with_checker(all_debrid.clone())
            .with_limits(
                config.sources.per_source_limit,
                config.sources.title_search_limit,
            );

        let state = Arc::new(AppState::new(config, Arc::new(scout)));
        let router = create_router(state);

        Self {
            router,
            torrentio,
            yts,
            leetx,
            piratebay,
            real_debrid,
            all_debrid,
            torrent_api,
            sleeper,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None, None).await
    }

    /// Send a POST request with JSON body and no token.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body), None).await
    }

    /// Send a POST request with JSON body and a bearer token.
    pub async fn post_with_token(&self, path: &str, body: Value, token: &str) -> TestResponse {
        self.request("POST", path, Some(body), Some(token)).await
    }

    /// GET returning the raw body, for non-JSON endpoints.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        (status, String::from_utf8_lossy(&body_bytes).to_string())
    }

    /// Send a request to the test server.
    async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        if let Some(token) = token {
            request_builder =
                request_builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
