use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::{handlers, recommend, tracks};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(state.cors_origins());

    let api_routes = Router::new()
        // Health, config, metrics
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::metrics))
        // Resolution pipeline
        .route("/recommend/from-track", post(recommend::from_track))
        .route("/recommend/diverse", post(recommend::diverse))
        // Sidecar proxies
        .route("/search-songs", post(tracks::search_songs))
        .route("/recommend-songs", post(tracks::recommend_songs))
        // Catalog matching and sampling
        .route("/find-tracks", post(tracks::find_tracks))
        .route("/random-tracks", get(tracks::random_tracks))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Restrict CORS to the configured origins; permissive when none are set
/// (the service usually sits behind a reverse proxy).
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let parsed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(parsed))
        .allow_methods(Any)
        .allow_headers(Any)
}
