//! Types for the resolution pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::TrackRecord;
use crate::recommender::LocalTrack;

/// The track recommendations are generated relative to. Caller-supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedTrack {
    pub title: String,
    pub primary_artist: String,
    /// The seed's id in the external catalog.
    pub catalog_id: String,
}

/// Which strategy tier produced a given output match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Local recommendation resolved by exact catalog search.
    LocalExactMatch,
    /// Diverse-mode local recommendation resolved by exact catalog search.
    LocalDiverseMatch,
    /// Provider recommendations seeded by the original track.
    CatalogSeedTrack,
    /// Provider recommendations seeded by the original track's artist.
    CatalogSeedArtist,
    /// Provider recommendations seeded by a fixed genre list.
    CatalogGenreFallback,
}

/// A recommendation resolved to a playable catalog track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedTrack {
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Full catalog record the match resolved to.
    pub track: TrackRecord,
    pub playable_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_uri: Option<String>,
    pub similarity: f64,
    pub provenance: Provenance,
}

impl MatchedTrack {
    /// Build a match from a catalog record plus pipeline-assigned score and
    /// provenance.
    pub fn from_record(record: TrackRecord, similarity: f64, provenance: Provenance) -> Self {
        Self {
            title: record.name.clone(),
            artist: record.artist_names(),
            album: record.album.name.clone(),
            playable_uri: record.uri.clone(),
            preview_uri: record.preview_url.clone(),
            track: record,
            similarity,
            provenance,
        }
    }
}

/// Per-candidate outcome of a catalog resolution attempt.
///
/// A candidate that fails to resolve is an explicit `NoMatch` entry, not a
/// skipped iteration, so the merger works from a complete, inspectable
/// input.
#[derive(Debug, Clone)]
pub enum CandidateResolution {
    Resolved(MatchedTrack),
    NoMatch { title: String, artist: String },
}

impl CandidateResolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, CandidateResolution::Resolved(_))
    }

    pub fn into_resolved(self) -> Option<MatchedTrack> {
        match self {
            CandidateResolution::Resolved(m) => Some(m),
            CandidateResolution::NoMatch { .. } => None,
        }
    }
}

/// Final result of one resolution call.
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionOutcome {
    /// Ordered, deduplicated matches; never longer than the configured cap.
    pub matches: Vec<MatchedTrack>,
    /// The local search hit used as the anchor, when the local tier won.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed_match: Option<LocalTrack>,
    pub diverse: bool,
}

/// Errors surfaced to the caller of a resolution.
///
/// Everything except a rejected credential degrades into a shorter (possibly
/// empty) match list instead of failing the call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("invalid or expired access token")]
    InvalidCredential,
}
