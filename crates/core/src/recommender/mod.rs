//! Local recommendation sidecar abstraction.
//!
//! This module provides a `Recommender` trait for the content-similarity
//! sidecar, with an HTTP implementation speaking its JSON contract. Retry
//! policy lives in the resolver, not here.

mod http;
mod types;

pub use http::HttpRecommender;
pub use types::*;
