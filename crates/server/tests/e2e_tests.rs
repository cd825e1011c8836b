//! End-to-end tests with mocked upstreams.
//!
//! These tests run the full router in-process; every source, availability
//! checker and the torrent API are mocks from `cachescout_core::testing`.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;

use cachescout_core::{testing::DebridCall, ContentKind, RemoteStatus, SearchError};
use common::{fixtures, TestFixture};

const H1_TITLE: &str = "Movie.2021.1080P.BluRay.x264\n👤 200 💾 4.0 GB ⚙️ RARBG";
const H2_TITLE: &str = "Movie.2021.720P.WEBRip\n👤 50 💾 1.1 GB";

// =============================================================================
// Basic API Tests
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/v1/health").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["sources"], json!(["yts", "1337x", "piratebay"]));
    assert_eq!(response.body["providers"], json!(["all_debrid", "real_debrid"]));
}

#[tokio::test]
async fn test_config_endpoint() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/v1/config").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["server"]["port"], 0);
    assert_eq!(response.body["resolver"]["max_polls"], 10);
    assert_eq!(
        response.body["sources"]["torrentio"]["base_url"],
        "https://torrentio.strem.fun"
    );
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let fixture = TestFixture::new();
    fixture.get("/api/v1/health").await;

    let (status, body) = fixture.get_text("/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("cachescout_http_requests_total"));
}

// =============================================================================
// Scraper Search
// =============================================================================

#[tokio::test]
async fn test_search_all_sorted_by_seeders_with_failing_source() {
    let fixture = TestFixture::new();
    fixture
        .yts
        .set_results(vec![
            fixtures::listing("Dune (2021) [720p]", 1, 80, "YTS"),
            fixtures::listing("Dune (2021) [1080p]", 2, 300, "YTS"),
        ])
        .await;
    fixture
        .leetx
        .set_results(vec![fixtures::listing("Dune.2021.2160p", 3, 120, "1337x")])
        .await;
    fixture
        .piratebay
        .set_next_error(SearchError::Timeout)
        .await;

    let response = fixture.get("/api/v1/torrents/search?query=dune%202021").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["count"], 3);
    let seeders: Vec<u64> = response.body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["seeders"].as_u64().unwrap())
        .collect();
    assert_eq!(seeders, vec![300, 120, 80]);
    assert_eq!(response.body["results"][1]["quality"], "2160p");

    let searches = fixture.yts.recorded_searches().await;
    assert_eq!(searches[0].text, "dune 2021");
    assert_eq!(searches[0].limit, Some(10));
    assert_eq!(fixture.piratebay.search_count().await, 1);
}

#[tokio::test]
async fn test_search_all_uses_caller_limit() {
    let fixture = TestFixture::new();
    fixture
        .leetx
        .set_results(vec![
            fixtures::listing("A 1080p", 1, 3, "1337x"),
            fixtures::listing("B 1080p", 2, 2, "1337x"),
            fixtures::listing("C 1080p", 3, 1, "1337x"),
        ])
        .await;

    let response = fixture.get("/api/v1/torrents/search?query=abc&limit=2").await;

    assert_eq!(response.body["count"], 2);
    assert_eq!(fixture.leetx.recorded_searches().await[0].limit, Some(2));
}

#[tokio::test]
async fn test_search_without_query_is_empty() {
    let fixture = TestFixture::new();

    let response = fixture.get("/api/v1/torrents/search").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["count"], 0);
    assert_eq!(fixture.yts.search_count().await, 0);
}

#[tokio::test]
async fn test_search_movie_composes_query() {
    let fixture = TestFixture::new();

    let response = fixture.get("/api/v1/torrents/movie?title=Dune&year=2021").await;

    assert_status!(response, StatusCode::OK);
    let search = &fixture.leetx.recorded_searches().await[0];
    assert_eq!(search.search_text(), "Dune 2021");
    assert_eq!(search.kind, ContentKind::Movie);
    assert_eq!(search.limit, Some(15));
}

#[tokio::test]
async fn test_search_tv_composes_query() {
    let fixture = TestFixture::new();

    fixture
        .get("/api/v1/torrents/tv?title=Severance&season=2&episode=3")
        .await;
    fixture.get("/api/v1/torrents/tv?title=Severance&season=2").await;

    let searches = fixture.piratebay.recorded_searches().await;
    assert_eq!(searches[0].search_text(), "Severance S02E03");
    assert_eq!(searches[1].search_text(), "Severance S02");
    assert_eq!(searches[0].kind, ContentKind::Tv);
}

// =============================================================================
// Debrid Cached Search
// =============================================================================

async fn seed_cached_h1(fixture: &TestFixture) {
    fixture
        .torrentio
        .set_results(vec![
            fixtures::candidate(H1_TITLE, 1),
            fixtures::candidate(H2_TITLE, 2),
        ])
        .await;
    fixture
        .real_debrid
        .add_cached(
            fixtures::info_hash(1),
            vec![fixtures::file("7", "Movie.2021.1080p.mkv", 4_000_000_000)],
        )
        .await;
}

#[tokio::test]
async fn test_cached_search_requires_token() {
    let fixture = TestFixture::new();
    seed_cached_h1(&fixture).await;

    let response = fixture
        .post("/api/v1/debrid/cached", json!({ "query": "Movie", "year": 2021 }))
        .await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Token required");
    assert_eq!(fixture.torrentio.search_count().await, 0);
}

#[tokio::test]
async fn test_cached_search_real_debrid() {
    let fixture = TestFixture::new();
    seed_cached_h1(&fixture).await;

    let response = fixture
        .post_with_token(
            "/api/v1/debrid/cached",
            json!({ "query": "Movie", "imdb_id": "tt1160419", "year": 2021 }),
            "rd-token",
        )
        .await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["provider"], "real_debrid");
    assert_eq!(response.body["count"], 1);

    let hit = &response.body["results"][0];
    assert_eq!(hit["cached"], true);
    assert_eq!(hit["info_hash"], fixtures::info_hash(1).to_string());
    assert_eq!(hit["quality"], "1080p");
    assert_eq!(hit["seeders"], 200);
    assert_eq!(hit["file_id"], "7");
    assert_eq!(hit["filesize"], 4_000_000_000u64);

    let checks = fixture.real_debrid.recorded_checks().await;
    assert_eq!(checks[0].credential, "rd-token");
    let query = &fixture.torrentio.recorded_searches().await[0];
    assert_eq!(query.imdb_id.as_deref(), Some("tt1160419"));
}

#[tokio::test]
async fn test_cached_search_provider_short_name() {
    let fixture = TestFixture::new();
    fixture
        .torrentio
        .set_results(vec![fixtures::candidate(H1_TITLE, 1)])
        .await;
    fixture
        .all_debrid
        .add_cached(fixtures::info_hash(1), vec![fixtures::file("0", "Movie.mkv", 10)])
        .await;

    let response = fixture
        .post_with_token(
            "/api/v1/debrid/cached",
            json!({ "query": "Movie", "provider": "ad" }),
            "ad-key",
        )
        .await;

    assert_eq!(response.body["provider"], "all_debrid");
    assert_eq!(response.body["count"], 1);
    assert!(fixture.real_debrid.recorded_checks().await.is_empty());
}

#[tokio::test]
async fn test_cached_search_unconfigured_or_unknown_provider_is_empty() {
    let fixture = TestFixture::new();
    seed_cached_h1(&fixture).await;

    let premiumize = fixture
        .post_with_token(
            "/api/v1/debrid/cached",
            json!({ "query": "Movie", "provider": "premiumize" }),
            "pm-key",
        )
        .await;
    assert_status!(premiumize, StatusCode::OK);
    assert_eq!(premiumize.body["provider"], "premiumize");
    assert_eq!(premiumize.body["count"], 0);

    let unknown = fixture
        .post_with_token(
            "/api/v1/debrid/cached",
            json!({ "query": "Movie", "provider": "putio" }),
            "key",
        )
        .await;
    assert_status!(unknown, StatusCode::OK);
    assert!(unknown.body["provider"].is_null());
    assert_eq!(unknown.body["count"], 0);
}

// =============================================================================
// Link Resolution
// =============================================================================

#[tokio::test]
async fn test_resolve_ready_torrent() {
    let fixture = TestFixture::new();
    fixture
        .torrent_api
        .push_info(fixtures::remote_info(RemoteStatus::WaitingFileSelection, &[]))
        .await;
    fixture
        .torrent_api
        .push_info(fixtures::remote_info(
            RemoteStatus::Downloaded,
            &["https://real-debrid.com/d/ABC"],
        ))
        .await;
    fixture
        .torrent_api
        .set_unrestricted("https://cdn.example/Movie.mkv")
        .await;

    let response = fixture
        .post_with_token(
            "/api/v1/debrid/resolve",
            json!({ "info_hash": fixtures::info_hash(1).to_string() }),
            "rd-token",
        )
        .await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["download_url"], "https://cdn.example/Movie.mkv");
    assert_eq!(response.body["polls"], 1);
    assert_eq!(response.body["state"]["selected_file_id"], "1");
    assert!(response.body.get("reason").is_none());

    let calls = fixture.torrent_api.recorded_calls().await;
    assert_eq!(calls.credentials_seen, vec!["rd-token"]);
}

#[tokio::test]
async fn test_resolve_from_magnet() {
    let fixture = TestFixture::new();
    fixture
        .torrent_api
        .set_default_info(fixtures::remote_info(
            RemoteStatus::Downloaded,
            &["https://real-debrid.com/d/XYZ"],
        ))
        .await;

    let magnet = format!("{}&dn=Movie", fixtures::info_hash(9).magnet_uri());
    let response = fixture
        .post_with_token(
            "/api/v1/debrid/resolve",
            json!({ "magnet": magnet, "file_id": "4" }),
            "rd-token",
        )
        .await;

    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["info_hash"], fixtures::info_hash(9).to_string());
    let calls = fixture.torrent_api.recorded_calls().await;
    assert_eq!(calls.select_files[0].1, "4");
}

#[tokio::test]
async fn test_resolve_empty_file_id_auto_selects() {
    let fixture = TestFixture::new();
    fixture
        .torrent_api
        .set_default_info(fixtures::remote_info(
            RemoteStatus::Downloaded,
            &["https://real-debrid.com/d/XYZ"],
        ))
        .await;

    let response = fixture
        .post_with_token(
            "/api/v1/debrid/resolve",
            json!({ "info_hash": fixtures::info_hash(1).to_string(), "file_id": "" }),
            "rd-token",
        )
        .await;

    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["state"]["selected_file_id"], "1");
    let calls = fixture.torrent_api.recorded_calls().await;
    assert_eq!(calls.select_files[0].1, "1");
}

#[tokio::test]
async fn test_resolve_stuck_torrent_exhausts_polls() {
    let fixture = TestFixture::new();
    fixture
        .torrent_api
        .set_default_info(fixtures::remote_info(RemoteStatus::Downloading, &[]))
        .await;

    let response = fixture
        .post_with_token(
            "/api/v1/debrid/resolve",
            json!({ "info_hash": fixtures::info_hash(1).to_string() }),
            "rd-token",
        )
        .await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["success"], false);
    assert!(response.body["download_url"].is_null());
    assert_eq!(response.body["polls"], 10);
    assert_eq!(response.body["reason"], "poll_budget_exhausted");
    assert_eq!(
        fixture.sleeper.sleeps().await,
        vec![Duration::from_secs(1); 10]
    );
}

#[tokio::test]
async fn test_resolve_invalid_hash_makes_no_calls() {
    let fixture = TestFixture::new();

    let response = fixture
        .post_with_token(
            "/api/v1/debrid/resolve",
            json!({ "info_hash": "not-a-hash" }),
            "rd-token",
        )
        .await;

    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["reason"], "invalid_hash");
    assert!(fixture.torrent_api.recorded_calls().await.added.is_empty());
}

#[tokio::test]
async fn test_resolve_submit_failure() {
    let fixture = TestFixture::new();
    fixture.torrent_api.set_failure(DebridCall::AddMagnet).await;

    let response = fixture
        .post_with_token(
            "/api/v1/debrid/resolve",
            json!({ "info_hash": fixtures::info_hash(1).to_string() }),
            "rd-token",
        )
        .await;

    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["reason"], "submit_failed");
    assert_eq!(response.body["polls"], 0);
}

#[tokio::test]
async fn test_resolve_requires_token() {
    let fixture = TestFixture::new();

    let response = fixture
        .post(
            "/api/v1/debrid/resolve",
            json!({ "info_hash": fixtures::info_hash(1).to_string() }),
        )
        .await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Token required");
}
