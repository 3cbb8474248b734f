//! Sidecar proxy, catalog matching, and sampling handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use tunefeed_core::{
    Candidate, CatalogError, LocalTrack, Provenance, ResolveError, TrackRecord, FALLBACK_GENRES,
};

use super::recommend::MatchedTrackResponse;
use super::ErrorResponse;
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchSongsRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct SearchSongsResponse {
    pub results: Vec<LocalTrack>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendSongsRequest {
    pub song_title: String,
    #[serde(default)]
    pub artist_name: Option<String>,
    #[serde(default)]
    pub num_recommendations: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct RecommendSongsResponse {
    pub recommendations: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct FindTracksRequest {
    pub tracks: Vec<SubmittedTrack>,
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmittedTrack {
    pub track: String,
    pub artist: String,
    #[serde(default)]
    pub track_id: Option<String>,
    #[serde(default)]
    pub similarity: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct FindTracksResponse {
    pub spotify_tracks: Vec<MatchedTrackResponse>,
}

#[derive(Debug, Deserialize)]
pub struct RandomTracksQuery {
    pub access_token: String,
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct RandomTracksResponse {
    pub tracks: Vec<TrackRecord>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/search-songs
///
/// Thin proxy to the sidecar's text search.
pub async fn search_songs(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SearchSongsRequest>,
) -> Result<Json<SearchSongsResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.recommender().search(&body.query).await {
        Ok(results) => Ok(Json(SearchSongsResponse { results })),
        Err(e) => {
            warn!(error = %e, "Sidecar search failed");
            Err((
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::new("search service unavailable")),
            ))
        }
    }
}

/// POST /api/v1/recommend-songs
///
/// Thin proxy to the sidecar's similarity recommendations.
pub async fn recommend_songs(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RecommendSongsRequest>,
) -> Result<Json<RecommendSongsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let count = body.num_recommendations.unwrap_or(10);
    let artist = body.artist_name.unwrap_or_default();

    match state
        .recommender()
        .recommend(&body.song_title, &artist, count)
        .await
    {
        Ok(recommendations) => Ok(Json(RecommendSongsResponse { recommendations })),
        Err(e) => {
            warn!(error = %e, "Sidecar recommendation failed");
            Err((
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::new("recommendation service unavailable")),
            ))
        }
    }
}

/// POST /api/v1/find-tracks
///
/// Match a submitted candidate list against the catalog: sample down to the
/// cap, resolve each, dedup. Candidates that fail to resolve are dropped.
pub async fn find_tracks(
    State(state): State<Arc<AppState>>,
    Json(body): Json<FindTracksRequest>,
) -> Result<Json<FindTracksResponse>, (StatusCode, Json<ErrorResponse>)> {
    let cap = state.resolution_cap();

    let sampled = state.sampler().sample(body.tracks, cap);
    let candidates: Vec<Candidate> = sampled
        .into_iter()
        .map(|t| Candidate {
            local_id: t.track_id.unwrap_or_default(),
            title: t.track,
            artist: t.artist,
            similarity: t.similarity.unwrap_or(0.0).clamp(0.0, 1.0),
        })
        .collect();

    match state
        .resolver()
        .match_candidates(&body.access_token, &candidates, Provenance::LocalExactMatch)
        .await
    {
        Ok(matches) => Ok(Json(FindTracksResponse {
            spotify_tracks: matches.into_iter().map(MatchedTrackResponse::from).collect(),
        })),
        Err(ResolveError::InvalidCredential) => Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("Invalid or expired access token")),
        )),
    }
}

/// GET /api/v1/random-tracks
///
/// Sample from the user's saved tracks; fall back to genre-seeded provider
/// recommendations when the library is empty or unreadable.
pub async fn random_tracks(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RandomTracksQuery>,
) -> Result<Json<RandomTracksResponse>, (StatusCode, Json<ErrorResponse>)> {
    let limit = params.limit.unwrap_or(10).min(50);
    let token = params.access_token;

    let saved = match state.catalog().saved_tracks(&token, 50).await {
        Ok(saved) => saved,
        Err(CatalogError::Unauthorized) => {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new("Invalid or expired access token")),
            ))
        }
        Err(e) => {
            warn!(error = %e, "Saved-tracks lookup failed");
            Vec::new()
        }
    };

    if !saved.is_empty() {
        let tracks = state.sampler().sample(saved, limit as usize);
        return Ok(Json(RandomTracksResponse { tracks }));
    }

    match state
        .catalog()
        .recommend_by_genres(&token, &FALLBACK_GENRES, limit)
        .await
    {
        Ok(tracks) => Ok(Json(RandomTracksResponse { tracks })),
        Err(CatalogError::Unauthorized) => Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("Invalid or expired access token")),
        )),
        Err(e) => {
            warn!(error = %e, "Genre fallback failed");
            Ok(Json(RandomTracksResponse { tracks: Vec::new() }))
        }
    }
}
