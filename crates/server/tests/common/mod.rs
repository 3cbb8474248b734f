//! Common test utilities for in-process API testing with mocks.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use tunefeed_core::{
    testing::{MockRecommender, MockTrackCatalog},
    Config, Recommender, ResolverConfig, TrackCatalog,
};
use tunefeed_server::api::create_router;
use tunefeed_server::state::AppState;

/// Re-export fixtures for test convenience
pub use tunefeed_core::testing::fixtures;

/// Test fixture: the full router wired to mock clients.
pub struct TestFixture {
    pub router: Router,
    pub recommender: Arc<MockRecommender>,
    pub catalog: Arc<MockTrackCatalog>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Fixture with test-friendly resolver settings: no backoff between
    /// rounds and a pinned sampling seed.
    pub fn new() -> Self {
        let mut config = Config::default();
        config.resolver = ResolverConfig {
            backoff_ms: 0,
            sample_seed: Some(42),
            ..Default::default()
        };
        Self::with_config(config)
    }

    pub fn with_config(config: Config) -> Self {
        let recommender = Arc::new(MockRecommender::new());
        let catalog = Arc::new(MockTrackCatalog::new());

        let state = Arc::new(AppState::new(
            config,
            Arc::clone(&recommender) as Arc<dyn Recommender>,
            Arc::clone(&catalog) as Arc<dyn TrackCatalog>,
        ));

        Self {
            router: create_router(state),
            recommender,
            catalog,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(path);
        let request = match body {
            Some(v) => builder
                .header("content-type", "application/json")
                .body(Body::from(v.to_string()))
                .expect("Failed to build request"),
            None => builder.body(Body::empty()).expect("Failed to build request"),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}
