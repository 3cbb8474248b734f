pub mod catalog;
pub mod config;
pub mod metrics;
pub mod recommender;
pub mod resolver;
pub mod testing;

pub use catalog::{
    AlbumRef, ArtistRef, CatalogError, SpotifyClient, TrackCatalog, TrackRecord,
};
pub use config::{
    load_config, load_config_from_str, validate_config, CatalogConfig, Config, ConfigError,
    RecommenderConfig, ResolverConfig, SanitizedConfig, ServerConfig,
};
pub use recommender::{Candidate, HttpRecommender, LocalTrack, Recommender, RecommenderError};
pub use resolver::{
    CandidateResolution, MatchedTrack, Provenance, ResolutionOutcome, ResolutionPipeline,
    ResolveError, RetryPolicy, Sampler, SeedTrack, FALLBACK_GENRES, GENRE_FALLBACK_SIMILARITY,
    SEED_FALLBACK_SIMILARITY,
};
