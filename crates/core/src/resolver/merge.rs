//! Result merging and shaping.

use std::collections::HashSet;

use super::types::{CandidateResolution, MatchedTrack, ResolutionOutcome};
use crate::recommender::LocalTrack;

/// Deduplicate by catalog track identity (first occurrence wins, preserving
/// relevance order), truncate to `cap`, and wrap in the outcome envelope.
pub fn shape(
    items: Vec<MatchedTrack>,
    cap: usize,
    diverse: bool,
    seed_match: Option<LocalTrack>,
) -> ResolutionOutcome {
    let mut seen = HashSet::new();
    let mut matches = Vec::with_capacity(cap.min(items.len()));

    for item in items {
        if !seen.insert(item.track.id.clone()) {
            continue;
        }
        matches.push(item);
        if matches.len() >= cap {
            break;
        }
    }

    ResolutionOutcome {
        matches,
        seed_match,
        diverse,
    }
}

/// Collapse per-candidate resolutions into the resolved matches, dropping
/// the explicit misses.
pub fn resolved(items: Vec<CandidateResolution>) -> Vec<MatchedTrack> {
    items
        .into_iter()
        .filter_map(CandidateResolution::into_resolved)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AlbumRef, ArtistRef, TrackRecord};
    use crate::resolver::Provenance;

    fn matched(id: &str, similarity: f64) -> MatchedTrack {
        MatchedTrack::from_record(
            TrackRecord {
                id: id.to_string(),
                name: format!("Track {}", id),
                artists: vec![ArtistRef {
                    id: "a".to_string(),
                    name: "Artist".to_string(),
                }],
                album: AlbumRef {
                    name: "Album".to_string(),
                },
                uri: format!("spotify:track:{}", id),
                preview_url: None,
            },
            similarity,
            Provenance::LocalExactMatch,
        )
    }

    #[test]
    fn test_shape_dedups_keeping_first() {
        let items = vec![matched("a", 0.9), matched("b", 0.8), matched("a", 0.7)];
        let outcome = shape(items, 10, false, None);

        assert_eq!(outcome.matches.len(), 2);
        assert_eq!(outcome.matches[0].track.id, "a");
        // The first occurrence's score survives.
        assert!((outcome.matches[0].similarity - 0.9).abs() < f64::EPSILON);
        assert_eq!(outcome.matches[1].track.id, "b");
    }

    #[test]
    fn test_shape_truncates_to_cap() {
        let items: Vec<_> = (0..25).map(|i| matched(&i.to_string(), 0.5)).collect();
        let outcome = shape(items, 10, false, None);
        assert_eq!(outcome.matches.len(), 10);
        // Relevance order preserved under truncation.
        assert_eq!(outcome.matches[0].track.id, "0");
        assert_eq!(outcome.matches[9].track.id, "9");
    }

    #[test]
    fn test_shape_dedup_does_not_eat_into_cap() {
        // Three ids, each repeated, cap 2: duplicates must not count.
        let items = vec![
            matched("a", 0.9),
            matched("a", 0.9),
            matched("b", 0.8),
            matched("b", 0.8),
            matched("c", 0.7),
        ];
        let outcome = shape(items, 2, false, None);
        assert_eq!(outcome.matches.len(), 2);
        assert_eq!(outcome.matches[1].track.id, "b");
    }

    #[test]
    fn test_shape_envelope_fields() {
        let anchor = LocalTrack {
            local_id: "loc-1".to_string(),
            title: "Seed".to_string(),
            artist: "Someone".to_string(),
            album: None,
        };
        let outcome = shape(vec![matched("a", 0.9)], 10, true, Some(anchor));

        assert!(outcome.diverse);
        assert_eq!(outcome.seed_match.as_ref().unwrap().local_id, "loc-1");
    }

    #[test]
    fn test_resolved_drops_misses() {
        let items = vec![
            CandidateResolution::Resolved(matched("a", 0.9)),
            CandidateResolution::NoMatch {
                title: "x".to_string(),
                artist: "y".to_string(),
            },
            CandidateResolution::Resolved(matched("b", 0.8)),
        ];

        let kept = resolved(items);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].track.id, "a");
        assert_eq!(kept[1].track.id, "b");
    }
}
