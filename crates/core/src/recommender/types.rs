//! Types for the local recommendation sidecar.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A track known to the sidecar, as returned by its text search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalTrack {
    /// Sidecar-internal track identifier.
    pub local_id: String,
    pub title: String,
    pub artist: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
}

/// A recommendation candidate produced by the sidecar.
///
/// Ephemeral: consumed within a single resolution call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// Sidecar-internal track identifier.
    pub local_id: String,
    pub title: String,
    pub artist: String,
    /// Similarity to the anchor, clamped to [0, 1] at the client boundary.
    pub similarity: f64,
}

/// Errors from the sidecar client.
///
/// Connection failures, timeouts, and non-2xx responses all collapse into
/// `Unavailable` so the resolver's retry handling stays mode-agnostic.
#[derive(Debug, Error)]
pub enum RecommenderError {
    #[error("recommendation service unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to parse recommendation response: {0}")]
    Parse(String),
}

/// Trait for the local recommendation service.
#[async_trait]
pub trait Recommender: Send + Sync {
    /// Free-text search over the sidecar's track index.
    async fn search(&self, query: &str) -> Result<Vec<LocalTrack>, RecommenderError>;

    /// Nearest-neighbor recommendations anchored on a title/artist pair.
    async fn recommend(
        &self,
        title: &str,
        artist: &str,
        count: u32,
    ) -> Result<Vec<Candidate>, RecommenderError>;

    /// Maximally dissimilar recommendations, addressed by sidecar track id.
    async fn recommend_diverse(
        &self,
        local_id: &str,
        count: u32,
    ) -> Result<Vec<Candidate>, RecommenderError>;

    /// Readiness probe.
    async fn health(&self) -> Result<(), RecommenderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_track_serialization() {
        let track = LocalTrack {
            local_id: "t-123".to_string(),
            title: "Karma Police".to_string(),
            artist: "Radiohead".to_string(),
            album: None,
        };

        let json = serde_json::to_string(&track).unwrap();
        assert!(!json.contains("album")); // None should be skipped

        let parsed: LocalTrack = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.local_id, "t-123");
        assert_eq!(parsed.title, "Karma Police");
    }

    #[test]
    fn test_unavailable_error_display() {
        let err = RecommenderError::Unavailable("connection refused".to_string());
        assert!(err.to_string().contains("unavailable"));
    }
}
