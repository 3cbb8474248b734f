//! Types for the external track catalog.

use serde::{Deserialize, Serialize};

/// A playable track as parsed from the catalog API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackRecord {
    /// Catalog track id - used for deduplication.
    pub id: String,
    pub name: String,
    pub artists: Vec<ArtistRef>,
    pub album: AlbumRef,
    /// Playable URI (e.g., "spotify:track:...").
    pub uri: String,
    /// 30s preview clip URL, when the catalog provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
}

impl TrackRecord {
    /// All artist names joined for display.
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The primary (first-credited) artist, if any.
    pub fn primary_artist(&self) -> Option<&ArtistRef> {
        self.artists.first()
    }
}

/// Artist reference within a track record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistRef {
    pub id: String,
    pub name: String,
}

/// Album reference within a track record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumRef {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> TrackRecord {
        TrackRecord {
            id: "5uQ0vKy2973Y9IUCd1wMEF".to_string(),
            name: "Paranoid Android".to_string(),
            artists: vec![
                ArtistRef {
                    id: "4Z8W4fKeB5YxbusRsdQVPb".to_string(),
                    name: "Radiohead".to_string(),
                },
                ArtistRef {
                    id: "guest".to_string(),
                    name: "Guest".to_string(),
                },
            ],
            album: AlbumRef {
                name: "OK Computer".to_string(),
            },
            uri: "spotify:track:5uQ0vKy2973Y9IUCd1wMEF".to_string(),
            preview_url: None,
        }
    }

    #[test]
    fn test_artist_names_joined() {
        assert_eq!(record().artist_names(), "Radiohead, Guest");
    }

    #[test]
    fn test_primary_artist() {
        let rec = record();
        assert_eq!(rec.primary_artist().unwrap().name, "Radiohead");
    }

    #[test]
    fn test_serialization_skips_missing_preview() {
        let json = serde_json::to_string(&record()).unwrap();
        assert!(!json.contains("preview_url"));
    }
}
