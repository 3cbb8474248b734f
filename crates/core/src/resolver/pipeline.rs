//! The resolution pipeline implementation.
//!
//! Tier order for a resolution call:
//! 1. One credential probe against the catalog identity endpoint.
//! 2. Up to `max_attempts` rounds of local-recommender anchoring plus
//!    per-candidate catalog resolution, flat backoff between rounds.
//! 3. Provider fallback (seed track / seed artist in similar mode, fixed
//!    genre list in diverse mode).
//! An empty match list is a valid outcome; the only hard failure is a
//! rejected credential.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::catalog::{CatalogError, TrackCatalog, TrackRecord};
use crate::config::ResolverConfig;
use crate::metrics;
use crate::recommender::{Candidate, LocalTrack, Recommender};

use super::merge;
use super::retry::RetryPolicy;
use super::types::{
    CandidateResolution, MatchedTrack, Provenance, ResolutionOutcome, ResolveError, SeedTrack,
};

/// Genres used for the diverse-mode provider fallback; intentionally broad
/// since genre-shuffled results are meant to be unrelated to the seed.
pub const FALLBACK_GENRES: [&str; 5] = ["pop", "rock", "electronic", "hip-hop", "jazz"];

/// Declared confidence for provider-seeded fallback results, where no true
/// similarity is computed.
pub const SEED_FALLBACK_SIMILARITY: f64 = 0.8;

/// Declared confidence for genre-shuffled fallback results.
pub const GENRE_FALLBACK_SIMILARITY: f64 = 0.15;

/// Upper bound on concurrent per-candidate catalog lookups.
const MAX_PARALLEL_LOOKUPS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResolveMode {
    Similar,
    Diverse,
}

impl ResolveMode {
    fn provenance(self) -> Provenance {
        match self {
            ResolveMode::Similar => Provenance::LocalExactMatch,
            ResolveMode::Diverse => Provenance::LocalDiverseMatch,
        }
    }

    fn is_diverse(self) -> bool {
        self == ResolveMode::Diverse
    }

    fn label(self) -> &'static str {
        match self {
            ResolveMode::Similar => "similar",
            ResolveMode::Diverse => "diverse",
        }
    }
}

/// One accepted local-tier round.
struct Round {
    anchor: LocalTrack,
    items: Vec<CandidateResolution>,
    attempt: u32,
}

/// The resolution pipeline. Holds no cross-request state; both clients are
/// injected so tests run against fakes.
pub struct ResolutionPipeline {
    recommender: Arc<dyn Recommender>,
    catalog: Arc<dyn TrackCatalog>,
    config: ResolverConfig,
}

impl ResolutionPipeline {
    pub fn new(
        recommender: Arc<dyn Recommender>,
        catalog: Arc<dyn TrackCatalog>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            recommender,
            catalog,
            config,
        }
    }

    /// Resolve recommendations similar to the seed.
    pub async fn resolve_similar(
        &self,
        seed: &SeedTrack,
        token: &str,
    ) -> Result<ResolutionOutcome, ResolveError> {
        self.resolve(seed, token, ResolveMode::Similar).await
    }

    /// Resolve recommendations intentionally far from the seed.
    pub async fn resolve_diverse(
        &self,
        seed: &SeedTrack,
        token: &str,
    ) -> Result<ResolutionOutcome, ResolveError> {
        self.resolve(seed, token, ResolveMode::Diverse).await
    }

    /// Resolve an arbitrary candidate list against the catalog, deduplicated
    /// and capped. Used by the candidate-matching endpoint.
    pub async fn match_candidates(
        &self,
        token: &str,
        candidates: &[Candidate],
        provenance: Provenance,
    ) -> Result<Vec<MatchedTrack>, ResolveError> {
        let items = self.resolve_candidates(token, candidates, provenance).await?;
        let cap = self.config.resolution_cap as usize;
        Ok(merge::shape(merge::resolved(items), cap, false, None).matches)
    }

    async fn resolve(
        &self,
        seed: &SeedTrack,
        token: &str,
        mode: ResolveMode,
    ) -> Result<ResolutionOutcome, ResolveError> {
        let started = Instant::now();
        let cap = self.config.resolution_cap as usize;

        // Credential checked once up front; retrying a rejected token cannot
        // succeed.
        match self.catalog.validate_token(token).await {
            Ok(true) => {}
            Ok(false) | Err(CatalogError::Unauthorized) => {
                metrics::RESOLUTIONS_TOTAL
                    .with_label_values(&[mode.label(), "invalid_credential"])
                    .inc();
                return Err(ResolveError::InvalidCredential);
            }
            Err(e) => {
                // The catalog is unreachable, so neither candidate
                // resolution nor the provider fallback can produce anything.
                warn!(error = %e, "Credential probe failed, returning empty outcome");
                metrics::RESOLUTIONS_TOTAL
                    .with_label_values(&[mode.label(), "empty"])
                    .inc();
                return Ok(merge::shape(Vec::new(), cap, mode.is_diverse(), None));
            }
        }

        let policy = RetryPolicy::new(
            self.config.max_attempts,
            Duration::from_millis(self.config.backoff_ms),
        );

        let round = policy
            .run(|attempt| self.attempt_round(seed, token, mode, attempt))
            .await?;

        let outcome = match round {
            Some(round) => {
                info!(
                    mode = mode.label(),
                    attempt = round.attempt,
                    anchor = %round.anchor.title,
                    resolved = round.items.iter().filter(|i| i.is_resolved()).count(),
                    "Local tier produced matches"
                );
                metrics::RESOLUTION_ROUNDS
                    .with_label_values(&[mode.label()])
                    .observe(round.attempt as f64);
                metrics::RESOLUTIONS_TOTAL
                    .with_label_values(&[mode.label(), "local"])
                    .inc();

                merge::shape(
                    merge::resolved(round.items),
                    cap,
                    mode.is_diverse(),
                    Some(round.anchor),
                )
            }
            None => {
                let fallback = self.provider_fallback(seed, token, mode).await?;
                let outcome_label = if fallback.is_empty() { "empty" } else { "fallback" };
                metrics::RESOLUTIONS_TOTAL
                    .with_label_values(&[mode.label(), outcome_label])
                    .inc();

                merge::shape(fallback, cap, mode.is_diverse(), None)
            }
        };

        metrics::RESOLUTION_DURATION
            .with_label_values(&[mode.label()])
            .observe(started.elapsed().as_secs_f64());

        Ok(outcome)
    }

    /// One round: anchor via sidecar search, fetch candidates, resolve them
    /// against the catalog. `Ok(None)` means the round produced nothing and
    /// the policy should retry.
    async fn attempt_round(
        &self,
        seed: &SeedTrack,
        token: &str,
        mode: ResolveMode,
        attempt: u32,
    ) -> Result<Option<Round>, ResolveError> {
        let query = format!("{} {}", seed.title, seed.primary_artist);
        let query = query.trim();

        let hits = match self.recommender.search(query).await {
            Ok(hits) => hits,
            Err(e) => {
                debug!(attempt = attempt, error = %e, "Sidecar search failed");
                return Ok(None);
            }
        };

        let Some(anchor) = hits.into_iter().next() else {
            debug!(attempt = attempt, query = query, "Sidecar search found no anchor");
            return Ok(None);
        };

        let candidates = match mode {
            ResolveMode::Similar => {
                self.recommender
                    .recommend(&anchor.title, &anchor.artist, self.config.request_count)
                    .await
            }
            // The diversity endpoint is id-addressed, which is why the
            // anchor has to come from search rather than free text.
            ResolveMode::Diverse => {
                self.recommender
                    .recommend_diverse(&anchor.local_id, self.config.request_count)
                    .await
            }
        };

        let candidates = match candidates {
            Ok(c) if !c.is_empty() => c,
            Ok(_) => {
                debug!(attempt = attempt, "Sidecar returned no candidates");
                return Ok(None);
            }
            Err(e) => {
                debug!(attempt = attempt, error = %e, "Sidecar recommendation failed");
                return Ok(None);
            }
        };

        let items = self
            .resolve_candidates(token, &candidates, mode.provenance())
            .await?;

        if items.iter().any(CandidateResolution::is_resolved) {
            Ok(Some(Round {
                anchor,
                items,
                attempt,
            }))
        } else {
            debug!(attempt = attempt, "No candidate resolved against the catalog");
            Ok(None)
        }
    }

    /// Resolve candidates to playable catalog tracks: bounded-parallel
    /// lookups whose output preserves the candidates' relevance order, with
    /// every miss recorded explicitly. A single failed lookup never sinks
    /// the batch; a rejected token does.
    async fn resolve_candidates(
        &self,
        token: &str,
        candidates: &[Candidate],
        provenance: Provenance,
    ) -> Result<Vec<CandidateResolution>, ResolveError> {
        let cap = self.config.resolution_cap as usize;

        let owned: Vec<Candidate> = candidates.iter().take(cap).cloned().collect();
        let lookups = owned.into_iter().map(|candidate| {
            let catalog = Arc::clone(&self.catalog);
            let token = token.to_string();
            async move {
                let result = catalog
                    .search_exact(&token, &candidate.title, &candidate.artist)
                    .await;
                (candidate, result)
            }
        });

        let outcomes: Vec<(Candidate, Result<Option<TrackRecord>, CatalogError>)> =
            stream::iter(lookups)
                .buffered(MAX_PARALLEL_LOOKUPS)
                .collect()
                .await;

        let mut items = Vec::with_capacity(outcomes.len());
        for (candidate, result) in outcomes {
            match result {
                Ok(Some(record)) => {
                    metrics::CATALOG_LOOKUPS
                        .with_label_values(&["search_exact", "resolved"])
                        .inc();
                    items.push(CandidateResolution::Resolved(MatchedTrack::from_record(
                        record,
                        candidate.similarity,
                        provenance,
                    )));
                }
                Ok(None) => {
                    metrics::CATALOG_LOOKUPS
                        .with_label_values(&["search_exact", "no_match"])
                        .inc();
                    items.push(CandidateResolution::NoMatch {
                        title: candidate.title,
                        artist: candidate.artist,
                    });
                }
                Err(CatalogError::Unauthorized) => {
                    return Err(ResolveError::InvalidCredential);
                }
                Err(e) => {
                    debug!(
                        title = %candidate.title,
                        artist = %candidate.artist,
                        error = %e,
                        "Catalog lookup failed, skipping candidate"
                    );
                    metrics::CATALOG_LOOKUPS
                        .with_label_values(&["search_exact", "error"])
                        .inc();
                    items.push(CandidateResolution::NoMatch {
                        title: candidate.title,
                        artist: candidate.artist,
                    });
                }
            }
        }

        Ok(items)
    }

    /// Provider fallback tiers when the local tier produced nothing.
    async fn provider_fallback(
        &self,
        seed: &SeedTrack,
        token: &str,
        mode: ResolveMode,
    ) -> Result<Vec<MatchedTrack>, ResolveError> {
        let limit = self.config.resolution_cap;

        match mode {
            ResolveMode::Diverse => {
                match self
                    .catalog
                    .recommend_by_genres(token, &FALLBACK_GENRES, limit)
                    .await
                {
                    Ok(records) => {
                        info!(count = records.len(), "Genre fallback produced tracks");
                        Ok(as_matches(
                            records,
                            GENRE_FALLBACK_SIMILARITY,
                            Provenance::CatalogGenreFallback,
                        ))
                    }
                    Err(CatalogError::Unauthorized) => Err(ResolveError::InvalidCredential),
                    Err(e) => {
                        warn!(error = %e, "Genre fallback failed");
                        Ok(Vec::new())
                    }
                }
            }
            ResolveMode::Similar => {
                match self
                    .catalog
                    .recommend_by_track(token, &seed.catalog_id, limit)
                    .await
                {
                    Ok(records) if !records.is_empty() => {
                        info!(count = records.len(), "Seed-track fallback produced tracks");
                        return Ok(as_matches(
                            records,
                            SEED_FALLBACK_SIMILARITY,
                            Provenance::CatalogSeedTrack,
                        ));
                    }
                    Ok(_) => debug!("Seed-track fallback returned nothing"),
                    Err(CatalogError::Unauthorized) => {
                        return Err(ResolveError::InvalidCredential)
                    }
                    Err(e) => warn!(error = %e, "Seed-track fallback failed"),
                }

                // Last tier: seed by the track's primary artist. The artist
                // id has to be recovered from the seed's own catalog record.
                let artist_id = match self
                    .catalog
                    .search_exact(token, &seed.title, &seed.primary_artist)
                    .await
                {
                    Ok(Some(record)) => record.primary_artist().map(|a| a.id.clone()),
                    Ok(None) => None,
                    Err(CatalogError::Unauthorized) => {
                        return Err(ResolveError::InvalidCredential)
                    }
                    Err(e) => {
                        debug!(error = %e, "Seed record lookup failed");
                        None
                    }
                };

                let Some(artist_id) = artist_id else {
                    return Ok(Vec::new());
                };

                match self
                    .catalog
                    .recommend_by_artist(token, &artist_id, limit)
                    .await
                {
                    Ok(records) => {
                        info!(count = records.len(), "Seed-artist fallback produced tracks");
                        Ok(as_matches(
                            records,
                            SEED_FALLBACK_SIMILARITY,
                            Provenance::CatalogSeedArtist,
                        ))
                    }
                    Err(CatalogError::Unauthorized) => Err(ResolveError::InvalidCredential),
                    Err(e) => {
                        warn!(error = %e, "Seed-artist fallback failed");
                        Ok(Vec::new())
                    }
                }
            }
        }
    }
}

fn as_matches(records: Vec<TrackRecord>, similarity: f64, provenance: Provenance) -> Vec<MatchedTrack> {
    records
        .into_iter()
        .map(|r| MatchedTrack::from_record(r, similarity, provenance))
        .collect()
}
