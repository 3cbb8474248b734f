//! External streaming catalog integration.
//!
//! This module provides a `TrackCatalog` trait for the third-party track
//! catalog the resolver matches against, with a Spotify Web API
//! implementation. All calls are bearer-token authenticated with the
//! caller's own token; the client holds no credentials of its own.

mod spotify;
mod types;

pub use spotify::SpotifyClient;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when interacting with the external catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Token rejected by the provider (401/403).
    #[error("Catalog rejected the access token")]
    Unauthorized,

    /// Provider throttled the request (429).
    #[error("Catalog rate limit exceeded")]
    RateLimited,

    /// Connection failure, timeout, or 5xx.
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    /// Other non-success API response.
    #[error("Catalog API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse catalog response: {0}")]
    Parse(String),
}

/// Trait for the external track catalog.
#[async_trait]
pub trait TrackCatalog: Send + Sync {
    /// Probe the identity endpoint to check whether a token is usable.
    async fn validate_token(&self, token: &str) -> Result<bool, CatalogError>;

    /// Exact-phrase title+artist search. `Ok(None)` when nothing playable
    /// matches.
    async fn search_exact(
        &self,
        token: &str,
        title: &str,
        artist: &str,
    ) -> Result<Option<TrackRecord>, CatalogError>;

    /// Provider recommendations seeded by a catalog track id.
    async fn recommend_by_track(
        &self,
        token: &str,
        track_id: &str,
        limit: u32,
    ) -> Result<Vec<TrackRecord>, CatalogError>;

    /// Provider recommendations seeded by an artist id.
    async fn recommend_by_artist(
        &self,
        token: &str,
        artist_id: &str,
        limit: u32,
    ) -> Result<Vec<TrackRecord>, CatalogError>;

    /// Provider recommendations seeded by genre names.
    async fn recommend_by_genres(
        &self,
        token: &str,
        genres: &[&str],
        limit: u32,
    ) -> Result<Vec<TrackRecord>, CatalogError>;

    /// Tracks saved in the user's library.
    async fn saved_tracks(&self, token: &str, limit: u32) -> Result<Vec<TrackRecord>, CatalogError>;
}
