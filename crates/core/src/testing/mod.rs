//! Testing utilities and mock implementations.
//!
//! Mock implementations of the two external service traits, so pipeline and
//! server behavior can be tested end-to-end without a sidecar or a real
//! catalog account.
//!
//! # Example
//!
//! ```rust,ignore
//! use tunefeed_core::testing::{fixtures, MockRecommender, MockTrackCatalog};
//!
//! let recommender = MockRecommender::new();
//! let catalog = MockTrackCatalog::new();
//!
//! recommender.set_search_results(vec![fixtures::local_track("l1", "Song", "Artist")]).await;
//! catalog.add_exact_match("Song", "Artist", fixtures::track_record("c1", "Song", "Artist")).await;
//! ```

mod mock_catalog;
mod mock_recommender;

pub use mock_catalog::{CatalogCall, MockTrackCatalog};
pub use mock_recommender::{MockRecommender, RecommenderCall};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::{AlbumRef, ArtistRef, TrackRecord};
    use crate::recommender::{Candidate, LocalTrack};
    use crate::resolver::SeedTrack;

    /// Create a sidecar search hit with reasonable defaults.
    pub fn local_track(local_id: &str, title: &str, artist: &str) -> LocalTrack {
        LocalTrack {
            local_id: local_id.to_string(),
            title: title.to_string(),
            artist: artist.to_string(),
            album: Some("Test Album".to_string()),
        }
    }

    /// Create a recommendation candidate.
    pub fn candidate(local_id: &str, title: &str, artist: &str, similarity: f64) -> Candidate {
        Candidate {
            local_id: local_id.to_string(),
            title: title.to_string(),
            artist: artist.to_string(),
            similarity,
        }
    }

    /// Create a playable catalog record.
    pub fn track_record(id: &str, title: &str, artist: &str) -> TrackRecord {
        TrackRecord {
            id: id.to_string(),
            name: title.to_string(),
            artists: vec![ArtistRef {
                id: format!("artist-{}", id),
                name: artist.to_string(),
            }],
            album: AlbumRef {
                name: "Test Album".to_string(),
            },
            uri: format!("spotify:track:{}", id),
            preview_url: Some(format!("https://preview.test/{}", id)),
        }
    }

    /// Create a seed track.
    pub fn seed_track(title: &str, artist: &str, catalog_id: &str) -> SeedTrack {
        SeedTrack {
            title: title.to_string(),
            primary_artist: artist.to_string(),
            catalog_id: catalog_id.to_string(),
        }
    }
}
