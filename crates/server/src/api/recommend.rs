//! Resolution pipeline handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tunefeed_core::{
    LocalTrack, MatchedTrack, Provenance, ResolutionOutcome, ResolveError, SeedTrack, TrackRecord,
};

use super::ErrorResponse;
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RecommendFromTrackRequest {
    pub track: SeedTrackBody,
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
pub struct SeedTrackBody {
    pub title: String,
    pub artist: String,
    /// The seed's id in the external catalog.
    pub id: String,
}

impl From<SeedTrackBody> for SeedTrack {
    fn from(body: SeedTrackBody) -> Self {
        SeedTrack {
            title: body.title,
            primary_artist: body.artist,
            catalog_id: body.id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub spotify_tracks: Vec<MatchedTrackResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_match: Option<LocalTrack>,
    pub diverse_mode: bool,
}

impl From<ResolutionOutcome> for ResolveResponse {
    fn from(outcome: ResolutionOutcome) -> Self {
        Self {
            spotify_tracks: outcome
                .matches
                .into_iter()
                .map(MatchedTrackResponse::from)
                .collect(),
            original_match: outcome.seed_match,
            diverse_mode: outcome.diverse,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MatchedTrackResponse {
    pub track: String,
    pub artist: String,
    pub album: String,
    pub similarity: f64,
    pub provenance: Provenance,
    pub spotify_track: TrackRecord,
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
}

impl From<MatchedTrack> for MatchedTrackResponse {
    fn from(m: MatchedTrack) -> Self {
        Self {
            track: m.title,
            artist: m.artist,
            album: m.album,
            similarity: m.similarity,
            provenance: m.provenance,
            uri: m.playable_uri,
            preview_url: m.preview_uri,
            spotify_track: m.track,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/recommend/from-track
///
/// Resolve recommendations similar to the submitted track. An empty list is
/// a valid 200 outcome; only a rejected token is an error.
pub async fn from_track(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RecommendFromTrackRequest>,
) -> Result<Json<ResolveResponse>, (StatusCode, Json<ErrorResponse>)> {
    let seed = SeedTrack::from(body.track);

    state
        .resolver()
        .resolve_similar(&seed, &body.access_token)
        .await
        .map(|outcome| Json(ResolveResponse::from(outcome)))
        .map_err(reject)
}

/// POST /api/v1/recommend/diverse
///
/// Resolve recommendations intentionally far from the submitted track.
pub async fn diverse(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RecommendFromTrackRequest>,
) -> Result<Json<ResolveResponse>, (StatusCode, Json<ErrorResponse>)> {
    let seed = SeedTrack::from(body.track);

    state
        .resolver()
        .resolve_diverse(&seed, &body.access_token)
        .await
        .map(|outcome| Json(ResolveResponse::from(outcome)))
        .map_err(reject)
}

fn reject(err: ResolveError) -> (StatusCode, Json<ErrorResponse>) {
    match err {
        ResolveError::InvalidCredential => (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("Invalid or expired access token")),
        ),
    }
}
