//! Multi-tier recommendation resolution.
//!
//! Turns a seed track into a bounded list of playable catalog tracks by
//! trying the local recommender first (with bounded retries) and falling
//! back to the provider's own recommendation endpoints when the local tier
//! produces nothing resolvable.

mod merge;
mod pipeline;
mod retry;
mod sampling;
mod types;

pub use merge::shape;
pub use pipeline::{
    ResolutionPipeline, FALLBACK_GENRES, GENRE_FALLBACK_SIMILARITY, SEED_FALLBACK_SIMILARITY,
};
pub use retry::RetryPolicy;
pub use sampling::Sampler;
pub use types::*;
