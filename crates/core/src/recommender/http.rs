//! HTTP client for the recommendation sidecar.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::config::RecommenderConfig;

use super::types::{Candidate, LocalTrack, Recommender, RecommenderError};

/// Recommender backed by the sidecar's HTTP API.
pub struct HttpRecommender {
    client: Client,
    base_url: String,
}

impl HttpRecommender {
    /// Create a new client from configuration.
    pub fn new(config: &RecommenderConfig) -> Result<Self, RecommenderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| RecommenderError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn post_json<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, RecommenderError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| RecommenderError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(RecommenderError::Unavailable(format!(
                "HTTP {}: {}",
                status,
                detail.chars().take(200).collect::<String>()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| RecommenderError::Parse(e.to_string()))
    }
}

#[async_trait]
impl Recommender for HttpRecommender {
    async fn search(&self, query: &str) -> Result<Vec<LocalTrack>, RecommenderError> {
        debug!(query = query, "Sidecar search");

        let response: SearchResponse = self
            .post_json("/search", &json!({ "query": query }))
            .await?;

        Ok(response.results.into_iter().map(Into::into).collect())
    }

    async fn recommend(
        &self,
        title: &str,
        artist: &str,
        count: u32,
    ) -> Result<Vec<Candidate>, RecommenderError> {
        debug!(title = title, artist = artist, count = count, "Sidecar recommend");

        let body = json!({
            "song_title": title,
            "artist_name": artist,
            "num_recommendations": count,
        });
        let response: RecommendResponse = self.post_json("/recommend", &body).await?;

        Ok(response.recommendations.into_iter().map(Into::into).collect())
    }

    async fn recommend_diverse(
        &self,
        local_id: &str,
        count: u32,
    ) -> Result<Vec<Candidate>, RecommenderError> {
        debug!(local_id = local_id, count = count, "Sidecar diverse recommend");

        let body = json!({
            "current_track_id": local_id,
            "num_recommendations": count,
        });
        let response: RecommendResponse = self.post_json("/recommend-diverse", &body).await?;

        Ok(response.recommendations.into_iter().map(Into::into).collect())
    }

    async fn health(&self) -> Result<(), RecommenderError> {
        let url = format!("{}/health", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RecommenderError::Unavailable(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(RecommenderError::Unavailable(format!(
                "health probe returned HTTP {}",
                response.status()
            )))
        }
    }
}

// ============================================================================
// Sidecar API Response Types (private)
// ============================================================================

// The sidecar answers soft failures (e.g. no match for a title) with a 2xx
// body carrying an "error" string instead of the data key. Defaulting the
// data fields turns those into empty lists rather than parse failures.

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SidecarTrack>,
}

#[derive(Debug, Deserialize)]
struct RecommendResponse {
    #[serde(default)]
    recommendations: Vec<SidecarRecommendation>,
}

#[derive(Debug, Deserialize)]
struct SidecarTrack {
    track_id: String,
    track: String,
    artist: String,
    #[serde(default)]
    album: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SidecarRecommendation {
    track_id: String,
    track: String,
    artist: String,
    #[serde(default)]
    similarity: f64,
}

impl From<SidecarTrack> for LocalTrack {
    fn from(t: SidecarTrack) -> Self {
        LocalTrack {
            local_id: t.track_id,
            title: t.track,
            artist: t.artist,
            album: t.album,
        }
    }
}

impl From<SidecarRecommendation> for Candidate {
    fn from(r: SidecarRecommendation) -> Self {
        Candidate {
            local_id: r.track_id,
            title: r.track,
            artist: r.artist,
            // The sidecar reports cosine similarity, which can dip below 0
            // for distant tracks.
            similarity: r.similarity.clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_response() {
        let json = r#"{
            "results": [
                {"track_id": "a1", "track": "Song One", "artist": "Artist A", "album": "LP"},
                {"track_id": "b2", "track": "Song Two", "artist": "Artist B"}
            ]
        }"#;

        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.results.len(), 2);

        let track: LocalTrack = response.results.into_iter().next().unwrap().into();
        assert_eq!(track.local_id, "a1");
        assert_eq!(track.album.as_deref(), Some("LP"));
    }

    #[test]
    fn test_parse_soft_error_as_empty() {
        // A 2xx body with only an error message must not fail parsing.
        let json = r#"{"error": "no match found", "matches": []}"#;
        let response: RecommendResponse = serde_json::from_str(json).unwrap();
        assert!(response.recommendations.is_empty());

        let search: SearchResponse = serde_json::from_str(json).unwrap();
        assert!(search.results.is_empty());
    }

    #[test]
    fn test_parse_recommend_response_with_extras() {
        // Diverse responses carry extra fields (pos_count, diverse_mode).
        let json = r#"{
            "recommendations": [
                {"track_id": "c3", "track": "Far Song", "artist": "Artist C",
                 "similarity": 0.12, "pos_count": 840}
            ],
            "diverse_mode": true
        }"#;

        let response: RecommendResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.recommendations.len(), 1);
        let candidate: Candidate = response.recommendations.into_iter().next().unwrap().into();
        assert_eq!(candidate.local_id, "c3");
        assert!((candidate.similarity - 0.12).abs() < f64::EPSILON);
    }

    #[test]
    fn test_similarity_clamped_to_unit_interval() {
        let below = SidecarRecommendation {
            track_id: "x".to_string(),
            track: "t".to_string(),
            artist: "a".to_string(),
            similarity: -0.3,
        };
        let above = SidecarRecommendation {
            track_id: "y".to_string(),
            track: "t".to_string(),
            artist: "a".to_string(),
            similarity: 1.7,
        };

        assert_eq!(Candidate::from(below).similarity, 0.0);
        assert_eq!(Candidate::from(above).similarity, 1.0);
    }
}
