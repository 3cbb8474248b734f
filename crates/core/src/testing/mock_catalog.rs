//! Mock track catalog for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::catalog::{CatalogError, TrackCatalog, TrackRecord};

/// A recorded catalog call for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogCall {
    ValidateToken,
    SearchExact { title: String, artist: String },
    RecommendByTrack { track_id: String, limit: u32 },
    RecommendByArtist { artist_id: String, limit: u32 },
    RecommendByGenres { genres: Vec<String>, limit: u32 },
    SavedTracks { limit: u32 },
}

/// Mock implementation of the TrackCatalog trait.
///
/// Exact matches are keyed on lowercase title+artist; recommendation seeds
/// return whatever list was configured for that tier, truncated to the
/// requested limit.
pub struct MockTrackCatalog {
    token_valid: Arc<RwLock<bool>>,
    unavailable: Arc<RwLock<bool>>,
    exact_matches: Arc<RwLock<HashMap<String, TrackRecord>>>,
    seed_track_results: Arc<RwLock<Vec<TrackRecord>>>,
    seed_artist_results: Arc<RwLock<Vec<TrackRecord>>>,
    genre_results: Arc<RwLock<Vec<TrackRecord>>>,
    saved: Arc<RwLock<Vec<TrackRecord>>>,
    calls: Arc<RwLock<Vec<CatalogCall>>>,
}

impl Default for MockTrackCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn match_key(title: &str, artist: &str) -> String {
    format!("{}|{}", title.to_lowercase(), artist.to_lowercase())
}

impl MockTrackCatalog {
    /// Create a new mock that accepts every token and matches nothing.
    pub fn new() -> Self {
        Self {
            token_valid: Arc::new(RwLock::new(true)),
            unavailable: Arc::new(RwLock::new(false)),
            exact_matches: Arc::new(RwLock::new(HashMap::new())),
            seed_track_results: Arc::new(RwLock::new(Vec::new())),
            seed_artist_results: Arc::new(RwLock::new(Vec::new())),
            genre_results: Arc::new(RwLock::new(Vec::new())),
            saved: Arc::new(RwLock::new(Vec::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Control whether the identity probe accepts tokens.
    pub async fn set_token_valid(&self, valid: bool) {
        *self.token_valid.write().await = valid;
    }

    /// Make every call fail with `Unavailable` until cleared.
    pub async fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.write().await = unavailable;
    }

    /// Register a record for an exact title+artist search.
    pub async fn add_exact_match(&self, title: &str, artist: &str, record: TrackRecord) {
        self.exact_matches
            .write()
            .await
            .insert(match_key(title, artist), record);
    }

    /// Set seed-track recommendation results.
    pub async fn set_seed_track_results(&self, records: Vec<TrackRecord>) {
        *self.seed_track_results.write().await = records;
    }

    /// Set seed-artist recommendation results.
    pub async fn set_seed_artist_results(&self, records: Vec<TrackRecord>) {
        *self.seed_artist_results.write().await = records;
    }

    /// Set genre-seeded recommendation results.
    pub async fn set_genre_results(&self, records: Vec<TrackRecord>) {
        *self.genre_results.write().await = records;
    }

    /// Set the user's saved tracks.
    pub async fn set_saved_tracks(&self, records: Vec<TrackRecord>) {
        *self.saved.write().await = records;
    }

    /// Get recorded calls.
    pub async fn recorded_calls(&self) -> Vec<CatalogCall> {
        self.calls.read().await.clone()
    }

    /// Get the number of calls performed.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    async fn record(&self, call: CatalogCall) -> Result<(), CatalogError> {
        self.calls.write().await.push(call);
        if *self.unavailable.read().await {
            return Err(CatalogError::Unavailable("mock offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TrackCatalog for MockTrackCatalog {
    async fn validate_token(&self, _token: &str) -> Result<bool, CatalogError> {
        self.record(CatalogCall::ValidateToken).await?;
        Ok(*self.token_valid.read().await)
    }

    async fn search_exact(
        &self,
        _token: &str,
        title: &str,
        artist: &str,
    ) -> Result<Option<TrackRecord>, CatalogError> {
        self.record(CatalogCall::SearchExact {
            title: title.to_string(),
            artist: artist.to_string(),
        })
        .await?;
        Ok(self
            .exact_matches
            .read()
            .await
            .get(&match_key(title, artist))
            .cloned())
    }

    async fn recommend_by_track(
        &self,
        _token: &str,
        track_id: &str,
        limit: u32,
    ) -> Result<Vec<TrackRecord>, CatalogError> {
        self.record(CatalogCall::RecommendByTrack {
            track_id: track_id.to_string(),
            limit,
        })
        .await?;
        let records = self.seed_track_results.read().await;
        Ok(records.iter().take(limit as usize).cloned().collect())
    }

    async fn recommend_by_artist(
        &self,
        _token: &str,
        artist_id: &str,
        limit: u32,
    ) -> Result<Vec<TrackRecord>, CatalogError> {
        self.record(CatalogCall::RecommendByArtist {
            artist_id: artist_id.to_string(),
            limit,
        })
        .await?;
        let records = self.seed_artist_results.read().await;
        Ok(records.iter().take(limit as usize).cloned().collect())
    }

    async fn recommend_by_genres(
        &self,
        _token: &str,
        genres: &[&str],
        limit: u32,
    ) -> Result<Vec<TrackRecord>, CatalogError> {
        self.record(CatalogCall::RecommendByGenres {
            genres: genres.iter().map(|g| g.to_string()).collect(),
            limit,
        })
        .await?;
        let records = self.genre_results.read().await;
        Ok(records.iter().take(limit as usize).cloned().collect())
    }

    async fn saved_tracks(&self, _token: &str, limit: u32) -> Result<Vec<TrackRecord>, CatalogError> {
        self.record(CatalogCall::SavedTracks { limit }).await?;
        let records = self.saved.read().await;
        Ok(records.iter().take(limit as usize).cloned().collect())
    }
}
