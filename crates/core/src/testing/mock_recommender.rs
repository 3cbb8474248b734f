//! Mock recommender for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::recommender::{Candidate, LocalTrack, Recommender, RecommenderError};

/// A recorded sidecar call for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum RecommenderCall {
    Search { query: String },
    Recommend { title: String, artist: String, count: u32 },
    RecommendDiverse { local_id: String, count: u32 },
    Health,
}

/// Mock implementation of the Recommender trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable search hits and candidates
/// - Track calls for assertions
/// - Simulate the sidecar being down
pub struct MockRecommender {
    search_results: Arc<RwLock<Vec<LocalTrack>>>,
    recommendations: Arc<RwLock<Vec<Candidate>>>,
    diverse_recommendations: Arc<RwLock<Vec<Candidate>>>,
    unavailable: Arc<RwLock<bool>>,
    calls: Arc<RwLock<Vec<RecommenderCall>>>,
}

impl Default for MockRecommender {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRecommender {
    /// Create a new mock with empty results.
    pub fn new() -> Self {
        Self {
            search_results: Arc::new(RwLock::new(Vec::new())),
            recommendations: Arc::new(RwLock::new(Vec::new())),
            diverse_recommendations: Arc::new(RwLock::new(Vec::new())),
            unavailable: Arc::new(RwLock::new(false)),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Set the hits returned by `search`.
    pub async fn set_search_results(&self, results: Vec<LocalTrack>) {
        *self.search_results.write().await = results;
    }

    /// Set the candidates returned by `recommend`.
    pub async fn set_recommendations(&self, candidates: Vec<Candidate>) {
        *self.recommendations.write().await = candidates;
    }

    /// Set the candidates returned by `recommend_diverse`.
    pub async fn set_diverse_recommendations(&self, candidates: Vec<Candidate>) {
        *self.diverse_recommendations.write().await = candidates;
    }

    /// Make every call fail with `Unavailable` until cleared.
    pub async fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.write().await = unavailable;
    }

    /// Get recorded calls.
    pub async fn recorded_calls(&self) -> Vec<RecommenderCall> {
        self.calls.read().await.clone()
    }

    /// Get the number of calls performed.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    /// Number of `search` calls performed.
    pub async fn search_count(&self) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| matches!(c, RecommenderCall::Search { .. }))
            .count()
    }

    async fn record(&self, call: RecommenderCall) -> Result<(), RecommenderError> {
        self.calls.write().await.push(call);
        if *self.unavailable.read().await {
            return Err(RecommenderError::Unavailable("mock offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Recommender for MockRecommender {
    async fn search(&self, query: &str) -> Result<Vec<LocalTrack>, RecommenderError> {
        self.record(RecommenderCall::Search {
            query: query.to_string(),
        })
        .await?;
        Ok(self.search_results.read().await.clone())
    }

    async fn recommend(
        &self,
        title: &str,
        artist: &str,
        count: u32,
    ) -> Result<Vec<Candidate>, RecommenderError> {
        self.record(RecommenderCall::Recommend {
            title: title.to_string(),
            artist: artist.to_string(),
            count,
        })
        .await?;
        let candidates = self.recommendations.read().await;
        Ok(candidates.iter().take(count as usize).cloned().collect())
    }

    async fn recommend_diverse(
        &self,
        local_id: &str,
        count: u32,
    ) -> Result<Vec<Candidate>, RecommenderError> {
        self.record(RecommenderCall::RecommendDiverse {
            local_id: local_id.to_string(),
            count,
        })
        .await?;
        let candidates = self.diverse_recommendations.read().await;
        Ok(candidates.iter().take(count as usize).cloned().collect())
    }

    async fn health(&self) -> Result<(), RecommenderError> {
        self.record(RecommenderCall::Health).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_records_calls() {
        let mock = MockRecommender::new();
        mock.search("hello world").await.unwrap();
        mock.recommend("Title", "Artist", 15).await.unwrap();

        let calls = mock.recorded_calls().await;
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[0],
            RecommenderCall::Search {
                query: "hello world".to_string()
            }
        );
        assert_eq!(mock.search_count().await, 1);
    }

    #[tokio::test]
    async fn test_unavailable_fails_every_call() {
        let mock = MockRecommender::new();
        mock.set_unavailable(true).await;

        assert!(mock.search("x").await.is_err());
        assert!(mock.recommend("t", "a", 5).await.is_err());
        assert!(mock.recommend_diverse("id", 5).await.is_err());
        assert!(mock.health().await.is_err());
        // Calls are still recorded.
        assert_eq!(mock.call_count().await, 4);
    }

    #[tokio::test]
    async fn test_recommend_respects_count() {
        let mock = MockRecommender::new();
        mock.set_recommendations(
            (0..20)
                .map(|i| fixtures::candidate(&i.to_string(), "T", "A", 0.5))
                .collect(),
        )
        .await;

        let candidates = mock.recommend("T", "A", 15).await.unwrap();
        assert_eq!(candidates.len(), 15);
    }
}
