use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{debrid, handlers, middleware::metrics_middleware, torrents};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Scraper search
        .route("/torrents/search", get(torrents::search_all))
        .route("/torrents/movie", get(torrents::search_movie))
        .route("/torrents/tv", get(torrents::search_tv))
        // Debrid cache and link resolution
        .route("/debrid/cached", post(debrid::search_cached))
        .route("/debrid/resolve", post(debrid::resolve))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(metrics_middleware)),
        )
}
