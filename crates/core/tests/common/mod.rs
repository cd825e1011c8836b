//! In-process fake of every upstream the adapters talk to.
//!
//! A single axum router serves Torrentio, YTS, 1337x, Pirate Bay and the
//! three debrid APIs under distinct path prefixes, and records what it was
//! asked so tests can assert on the outgoing requests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::{json, Map, Value};

use cachescout_core::config::{Config, EndpointConfig};

pub const GOOD_TOKEN: &str = "good-token";

/// Cached everywhere; Torrentio lists it first.
pub const H1: &str = "a1b2c3d4e5f60718293a4b5c6d7e8f9012345678";
/// Listed by Torrentio, never cached.
pub const H2: &str = "b1b2c3d4e5f60718293a4b5c6d7e8f9012345678";
/// Served by YTS in upper case.
pub const H3: &str = "C1B2C3D4E5F60718293A4B5C6D7E8F9012345678";
/// Served by the 1337x detail page.
pub const H4: &str = "d1b2c3d4e5f60718293a4b5c6d7e8f9012345678";

pub const UNRESTRICTED_URL: &str = "https://download.fake/Movie.2021.1080p.mkv";

#[derive(Debug, Default)]
pub struct Recorded {
    pub torrentio_paths: Vec<String>,
    pub yts_queries: Vec<HashMap<String, String>>,
    pub leetx_searches: Vec<String>,
    pub leetx_detail_fetches: usize,
    pub rd_availability: Vec<Vec<String>>,
    pub rd_added: Vec<String>,
    pub rd_info_calls: usize,
    pub rd_selected: Vec<String>,
    pub rd_unrestricted: Vec<String>,
    pub alldebrid_params: Vec<Vec<(String, String)>>,
    pub premiumize_params: Vec<Vec<(String, String)>>,
}

type Shared = Arc<Mutex<Recorded>>;

pub struct FakeUpstream {
    pub addr: SocketAddr,
    pub recorded: Shared,
}

impl FakeUpstream {
    pub async fn start() -> Self {
        let recorded: Shared = Arc::new(Mutex::new(Recorded::default()));

        let app = Router::new()
            .route("/torrentio/stream/movie/{id}", get(torrentio_movie))
            .route("/torrentio/stream/series/{id}", get(torrentio_series))
            .route("/yts/api/v2/list_movies.json", get(yts_list_movies))
            .route("/leetx/search/{terms}/{page}/", get(leetx_search))
            .route("/leetx/torrent/{id}/{slug}/", get(leetx_detail))
            .route("/tpb/search/{terms}/{page}/{order}/{category}", get(tpb_search))
            .route(
                "/rd/rest/1.0/torrents/instantAvailability/{*hashes}",
                get(rd_availability),
            )
            .route("/rd/rest/1.0/torrents/addMagnet", post(rd_add_magnet))
            .route("/rd/rest/1.0/torrents/info/{id}", get(rd_info))
            .route("/rd/rest/1.0/torrents/selectFiles/{id}", post(rd_select_files))
            .route("/rd/rest/1.0/unrestrict/link", post(rd_unrestrict))
            .route("/ad/v4/magnet/instant", get(alldebrid_instant))
            .route("/pm/api/cache/check", get(premiumize_check))
            .with_state(recorded.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake upstream");
        let addr = listener.local_addr().expect("fake upstream address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake upstream server");
        });

        Self { addr, recorded }
    }

    pub fn url(&self, prefix: &str) -> String {
        format!("http://{}/{}", self.addr, prefix)
    }

    /// Configuration pointing every adapter and checker at this fake.
    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.sources.torrentio = EndpointConfig::new(self.url("torrentio"), 5);
        config.sources.yts = EndpointConfig::new(self.url("yts/api/v2"), 5);
        config.sources.leetx = EndpointConfig::new(self.url("leetx"), 5);
        config.sources.piratebay = EndpointConfig::new(self.url("tpb"), 5);
        config.debrid.real_debrid.base_url = self.url("rd/rest/1.0");
        config.debrid.all_debrid.base_url = self.url("ad/v4");
        config.debrid.premiumize.base_url = self.url("pm/api");
        config.resolver.poll_interval_ms = 5;
        config
    }

    pub fn recorded(&self) -> std::sync::MutexGuard<'_, Recorded> {
        self.recorded.lock().expect("recorded state")
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", GOOD_TOKEN))
}

fn rd_unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "bad_token", "error_code": 8 })),
    )
        .into_response()
}

async fn torrentio_movie(State(state): State<Shared>, Path(id): Path<String>) -> Json<Value> {
    state.lock().unwrap().torrentio_paths.push(format!("movie/{}", id));

    if id != "tt1160419.json" {
        return Json(json!({ "streams": [] }));
    }
    Json(json!({
        "streams": [
            {
                "name": "Torrentio\n1080p",
                "title": "Movie.2021.1080P.BluRay.x264-SPARKS\n👤 200 💾 4.0 GB ⚙️ RARBG",
                "infoHash": H1
            },
            {
                "name": "Torrentio\n720p",
                "title": "Movie.2021.720P.WEBRip\n👤 50 💾 1.1 GB",
                "infoHash": H2
            },
            { "name": "Torrentio", "title": "No hash here", "url": "https://example.invalid" }
        ]
    }))
}

async fn torrentio_series(State(state): State<Shared>, Path(id): Path<String>) -> Json<Value> {
    state.lock().unwrap().torrentio_paths.push(format!("series/{}", id));
    Json(json!({ "streams": [] }))
}

async fn yts_list_movies(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    state.lock().unwrap().yts_queries.push(params);
    Json(json!({
        "status": "ok",
        "status_message": "Query was successful",
        "data": {
            "movie_count": 1,
            "movies": [{
                "title": "Dune",
                "year": 2021,
                "torrents": [
                    { "quality": "1080p", "hash": H3, "size": "2.1 GB", "seeds": 300, "peers": 12 }
                ]
            }]
        }
    }))
}

async fn leetx_search(
    State(state): State<Shared>,
    Path((terms, _page)): Path<(String, String)>,
) -> Html<&'static str> {
    state.lock().unwrap().leetx_searches.push(terms);
    Html(
        r#"<table class="table-list"><thead><tr><th>name</th><th>se</th><th>le</th><th>time</th><th>size</th></tr></thead>
        <tbody>
        <tr>
          <td class="coll-1 name"><a href="/sub/42/0/" class="icon"></a><a href="/torrent/77/Dune-2021-720p/">Dune 2021 720p WEBRip</a></td>
          <td class="coll-2 seeds">150</td>
          <td class="coll-3 leeches">9</td>
          <td class="coll-date">Oct. 1st '21</td>
          <td class="coll-4 size">1.2 GB<span class="seeds">150</span></td>
        </tr>
        <tr>
          <td class="coll-1 name"><a href="/torrent/78/Dune-broken/">Dune broken detail</a></td>
          <td class="coll-2 seeds">5</td>
          <td class="coll-3 leeches">1</td>
          <td class="coll-date">Oct. 1st '21</td>
          <td class="coll-4 size">700 MB<span class="seeds">5</span></td>
        </tr>
        </tbody></table>"#,
    )
}

async fn leetx_detail(
    State(state): State<Shared>,
    Path((id, _slug)): Path<(String, String)>,
) -> Response {
    state.lock().unwrap().leetx_detail_fetches += 1;
    if id != "77" {
        return StatusCode::NOT_FOUND.into_response();
    }
    Html(format!(
        r#"<div class="torrent-detail"><a href="magnet:?xt=urn:btih:{}&dn=Dune">Magnet Download</a></div>"#,
        H4
    ))
    .into_response()
}

async fn tpb_search() -> StatusCode {
    StatusCode::SERVICE_UNAVAILABLE
}

async fn rd_availability(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(hashes): Path<String>,
) -> Response {
    if !authorized(&headers) {
        return rd_unauthorized();
    }

    let hashes: Vec<String> = hashes.split('/').map(str::to_string).collect();
    state.lock().unwrap().rd_availability.push(hashes.clone());

    let mut body = Map::new();
    for hash in hashes {
        let entry = if hash == H2 {
            json!([])
        } else {
            json!({
                "rd": [{
                    "1": { "filename": "Movie.2021.1080p.mkv", "filesize": 4_000_000_000u64 },
                    "2": { "filename": "Movie.2021.1080p.nfo", "filesize": 1_200u64 }
                }]
            })
        };
        body.insert(hash, entry);
    }
    Json(Value::Object(body)).into_response()
}

async fn rd_add_magnet(
    State(state): State<Shared>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return rd_unauthorized();
    }
    let magnet = form.get("magnet").cloned().unwrap_or_default();
    state.lock().unwrap().rd_added.push(magnet);
    (
        StatusCode::CREATED,
        Json(json!({ "id": "FAKETORRENT1", "uri": "https://api.real-debrid.com/rest/1.0/torrents/info/FAKETORRENT1" })),
    )
        .into_response()
}

async fn rd_info(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    if !authorized(&headers) {
        return rd_unauthorized();
    }
    if id != "FAKETORRENT1" {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "unknown_ressource" }))).into_response();
    }

    let call = {
        let mut recorded = state.lock().unwrap();
        recorded.rd_info_calls += 1;
        recorded.rd_info_calls
    };
    let (status, links) = match call {
        1 => ("waiting_files_selection", json!([])),
        2 => ("downloading", json!([])),
        _ => ("downloaded", json!(["https://real-debrid.com/d/FAKELINK1"])),
    };

    Json(json!({
        "id": id,
        "status": status,
        "progress": if status == "downloaded" { 100 } else { 0 },
        "files": [
            { "id": 1, "path": "/Sample.mkv", "bytes": 50_000_000u64, "selected": 0 },
            { "id": 2, "path": "/Movie.2021.1080p.mkv", "bytes": 4_000_000_000u64, "selected": 0 },
            { "id": 3, "path": "/Movie.2021.1080p.nfo", "bytes": 1_200u64, "selected": 0 }
        ],
        "links": links
    }))
    .into_response()
}

async fn rd_select_files(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(_id): Path<String>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return rd_unauthorized();
    }
    let files = form.get("files").cloned().unwrap_or_default();
    state.lock().unwrap().rd_selected.push(files);
    StatusCode::NO_CONTENT.into_response()
}

async fn rd_unrestrict(
    State(state): State<Shared>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return rd_unauthorized();
    }
    let link = form.get("link").cloned().unwrap_or_default();
    state.lock().unwrap().rd_unrestricted.push(link);
    Json(json!({ "id": "DL1", "filename": "Movie.2021.1080p.mkv", "download": UNRESTRICTED_URL }))
        .into_response()
}

async fn alldebrid_instant(
    State(state): State<Shared>,
    Query(params): Query<Vec<(String, String)>>,
) -> Json<Value> {
    state.lock().unwrap().alldebrid_params.push(params.clone());

    let apikey = params
        .iter()
        .find(|(k, _)| k == "apikey")
        .map(|(_, v)| v.as_str());
    if apikey != Some(GOOD_TOKEN) {
        return Json(json!({
            "status": "error",
            "error": { "code": "AUTH_BAD_APIKEY", "message": "The auth apikey is invalid" }
        }));
    }

    let magnets: Vec<Value> = params
        .iter()
        .filter(|(k, _)| k.starts_with("magnets["))
        .filter_map(|(_, magnet)| magnet.strip_prefix("magnet:?xt=urn:btih:"))
        .map(|hash| {
            if hash == H1 {
                json!({
                    "magnet": hash,
                    "hash": hash,
                    "instant": true,
                    "files": [{ "n": "Movie", "e": [
                        { "n": "Movie.2021.1080p.mkv", "s": 4_000_000_000u64 },
                        { "n": "Sample.mkv", "s": 50_000_000u64 }
                    ]}]
                })
            } else {
                json!({ "magnet": hash, "hash": hash, "instant": false })
            }
        })
        .collect();

    Json(json!({ "status": "success", "data": { "magnets": magnets } }))
}

async fn premiumize_check(
    State(state): State<Shared>,
    Query(params): Query<Vec<(String, String)>>,
) -> Json<Value> {
    state.lock().unwrap().premiumize_params.push(params.clone());

    let items: Vec<&str> = params
        .iter()
        .filter(|(k, _)| k == "items[]")
        .map(|(_, v)| v.as_str())
        .collect();
    let response: Vec<bool> = items.iter().map(|h| *h == H1).collect();
    let filename: Vec<Value> = items
        .iter()
        .map(|h| if *h == H1 { json!("Movie.2021.1080p.mkv") } else { Value::Null })
        .collect();
    let filesize: Vec<Value> = items
        .iter()
        .map(|h| if *h == H1 { json!("4000000000") } else { Value::Null })
        .collect();

    Json(json!({
        "status": "success",
        "response": response,
        "transcoded": response,
        "filename": filename,
        "filesize": filesize
    }))
}
