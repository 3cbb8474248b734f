//! Spotify Web API client.
//!
//! All operations are authenticated with the caller-supplied bearer token;
//! OAuth acquisition and refresh happen outside this service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::CatalogConfig;

use super::types::{AlbumRef, ArtistRef, TrackRecord};
use super::{CatalogError, TrackCatalog};

/// Spotify Web API client.
pub struct SpotifyClient {
    client: Client,
    base_url: String,
}

impl SpotifyClient {
    /// Create a new client from configuration.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn get(&self, token: &str, path: &str) -> RequestBuilder {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
    }

    async fn send<R: for<'de> Deserialize<'de>>(
        &self,
        request: RequestBuilder,
    ) -> Result<R, CatalogError> {
        let response = request.send().await.map_err(classify_transport)?;

        let status = response.status();
        if let Some(err) = classify_status(status) {
            let body = response.text().await.unwrap_or_default();
            if !body.is_empty() {
                debug!(status = %status, "Catalog error body: {}", body.chars().take(200).collect::<String>());
            }
            return Err(err);
        }

        response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))
    }

    async fn recommendations(
        &self,
        token: &str,
        seed_param: (&str, String),
        limit: u32,
    ) -> Result<Vec<TrackRecord>, CatalogError> {
        let request = self
            .get(token, "/v1/recommendations")
            .query(&[seed_param.clone(), ("limit", limit.to_string())]);

        debug!(seed = %seed_param.1, limit = limit, "Catalog recommendations");

        let response: RecommendationsResponse = self.send(request).await?;
        Ok(playable(response.tracks))
    }
}

#[async_trait]
impl TrackCatalog for SpotifyClient {
    async fn validate_token(&self, token: &str) -> Result<bool, CatalogError> {
        let response = self
            .get(token, "/v1/me")
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if status.is_success() {
            return Ok(true);
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Ok(false);
        }
        match classify_status(status) {
            Some(err) => Err(err),
            None => Ok(true),
        }
    }

    async fn search_exact(
        &self,
        token: &str,
        title: &str,
        artist: &str,
    ) -> Result<Option<TrackRecord>, CatalogError> {
        let query = exact_phrase_query(title, artist);
        debug!(query = %query, "Catalog exact search");

        let request = self
            .get(token, "/v1/search")
            .query(&[("q", query.as_str()), ("type", "track"), ("limit", "1")]);

        let response: SearchResponse = self.send(request).await?;

        Ok(response
            .tracks
            .items
            .into_iter()
            .find_map(|t| t.into_record()))
    }

    async fn recommend_by_track(
        &self,
        token: &str,
        track_id: &str,
        limit: u32,
    ) -> Result<Vec<TrackRecord>, CatalogError> {
        self.recommendations(token, ("seed_tracks", track_id.to_string()), limit)
            .await
    }

    async fn recommend_by_artist(
        &self,
        token: &str,
        artist_id: &str,
        limit: u32,
    ) -> Result<Vec<TrackRecord>, CatalogError> {
        self.recommendations(token, ("seed_artists", artist_id.to_string()), limit)
            .await
    }

    async fn recommend_by_genres(
        &self,
        token: &str,
        genres: &[&str],
        limit: u32,
    ) -> Result<Vec<TrackRecord>, CatalogError> {
        self.recommendations(token, ("seed_genres", genres.join(",")), limit)
            .await
    }

    async fn saved_tracks(&self, token: &str, limit: u32) -> Result<Vec<TrackRecord>, CatalogError> {
        let limit = limit.min(50); // Spotify max page size
        let request = self
            .get(token, "/v1/me/tracks")
            .query(&[("limit", limit.to_string()), ("offset", "0".to_string())]);

        let response: SavedTracksResponse = self.send(request).await?;
        Ok(playable(
            response.items.into_iter().map(|i| i.track).collect(),
        ))
    }
}

/// Build Spotify's exact-phrase field query: `track:"X" artist:"Y"`.
fn exact_phrase_query(title: &str, artist: &str) -> String {
    format!(r#"track:"{}" artist:"{}""#, title, artist)
}

fn classify_transport(e: reqwest::Error) -> CatalogError {
    if e.is_timeout() || e.is_connect() {
        CatalogError::Unavailable(e.to_string())
    } else {
        CatalogError::Api {
            status: e.status().map(|s| s.as_u16()).unwrap_or(0),
            message: e.to_string(),
        }
    }
}

/// Map a non-success status to its error class; `None` for success.
fn classify_status(status: StatusCode) -> Option<CatalogError> {
    if status.is_success() {
        return None;
    }
    Some(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CatalogError::Unauthorized,
        StatusCode::TOO_MANY_REQUESTS => {
            warn!("Catalog rate limit exceeded");
            CatalogError::RateLimited
        }
        s if s.is_server_error() => CatalogError::Unavailable(format!("HTTP {}", s)),
        s => CatalogError::Api {
            status: s.as_u16(),
            message: String::new(),
        },
    })
}

/// Drop records the conversion rejected (no playable URI).
fn playable(tracks: Vec<ApiTrack>) -> Vec<TrackRecord> {
    tracks.into_iter().filter_map(|t| t.into_record()).collect()
}

// ============================================================================
// Spotify API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    tracks: TrackPage,
}

#[derive(Debug, Deserialize, Default)]
struct TrackPage {
    #[serde(default)]
    items: Vec<ApiTrack>,
}

#[derive(Debug, Deserialize)]
struct RecommendationsResponse {
    #[serde(default)]
    tracks: Vec<ApiTrack>,
}

#[derive(Debug, Deserialize)]
struct SavedTracksResponse {
    #[serde(default)]
    items: Vec<SavedItem>,
}

#[derive(Debug, Deserialize)]
struct SavedItem {
    track: ApiTrack,
}

#[derive(Debug, Deserialize)]
struct ApiTrack {
    id: String,
    name: String,
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    preview_url: Option<String>,
    #[serde(default)]
    artists: Vec<ApiArtist>,
    #[serde(default)]
    album: Option<ApiAlbum>,
}

#[derive(Debug, Deserialize)]
struct ApiArtist {
    #[serde(default)]
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiAlbum {
    name: String,
}

impl ApiTrack {
    /// Convert to a TrackRecord, or `None` when the item is not playable.
    fn into_record(self) -> Option<TrackRecord> {
        let uri = self.uri.filter(|u| !u.is_empty())?;

        Some(TrackRecord {
            id: self.id,
            name: self.name,
            artists: self
                .artists
                .into_iter()
                .map(|a| ArtistRef {
                    id: a.id,
                    name: a.name,
                })
                .collect(),
            album: AlbumRef {
                name: self.album.map(|a| a.name).unwrap_or_default(),
            },
            uri,
            preview_url: self.preview_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_phrase_query() {
        let q = exact_phrase_query("No Surprises", "Radiohead");
        assert_eq!(q, r#"track:"No Surprises" artist:"Radiohead""#);
    }

    #[test]
    fn test_classify_status() {
        assert!(classify_status(StatusCode::OK).is_none());
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED),
            Some(CatalogError::Unauthorized)
        ));
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN),
            Some(CatalogError::Unauthorized)
        ));
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS),
            Some(CatalogError::RateLimited)
        ));
        assert!(matches!(
            classify_status(StatusCode::BAD_GATEWAY),
            Some(CatalogError::Unavailable(_))
        ));
        assert!(matches!(
            classify_status(StatusCode::NOT_FOUND),
            Some(CatalogError::Api { status: 404, .. })
        ));
    }

    #[test]
    fn test_parse_search_response() {
        let json = r#"{
            "tracks": {
                "items": [{
                    "id": "11dFghVXANMlKmJXsNCbNl",
                    "name": "Cut To The Feeling",
                    "uri": "spotify:track:11dFghVXANMlKmJXsNCbNl",
                    "preview_url": "https://p.scdn.co/mp3-preview/x",
                    "artists": [{"id": "6sFIWsNpZYqfjUpaCgueju", "name": "Carly Rae Jepsen"}],
                    "album": {"name": "Cut To The Feeling"}
                }]
            }
        }"#;

        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let record = response
            .tracks
            .items
            .into_iter()
            .next()
            .unwrap()
            .into_record()
            .unwrap();

        assert_eq!(record.id, "11dFghVXANMlKmJXsNCbNl");
        assert_eq!(record.artist_names(), "Carly Rae Jepsen");
        assert_eq!(record.album.name, "Cut To The Feeling");
        assert!(record.preview_url.is_some());
    }

    #[test]
    fn test_parse_empty_search_response() {
        let response: SearchResponse = serde_json::from_str(r#"{"tracks": {"items": []}}"#).unwrap();
        assert!(response.tracks.items.is_empty());

        // Missing tracks object entirely
        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.tracks.items.is_empty());
    }

    #[test]
    fn test_track_without_uri_is_not_playable() {
        let json = r#"{
            "id": "x",
            "name": "Ghost Track",
            "artists": [{"name": "Nobody"}],
            "album": {"name": "Nothing"}
        }"#;

        let track: ApiTrack = serde_json::from_str(json).unwrap();
        assert!(track.into_record().is_none());
    }

    #[test]
    fn test_parse_saved_tracks_response() {
        let json = r#"{
            "items": [
                {"track": {"id": "a", "name": "A", "uri": "spotify:track:a",
                           "artists": [{"id": "ar", "name": "Artist"}],
                           "album": {"name": "Al"}}},
                {"track": {"id": "b", "name": "B",
                           "artists": [], "album": {"name": ""}}}
            ]
        }"#;

        let response: SavedTracksResponse = serde_json::from_str(json).unwrap();
        let records = playable(response.items.into_iter().map(|i| i.track).collect());
        // The record without a URI is dropped.
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "a");
    }
}
