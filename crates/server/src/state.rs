use std::sync::Arc;

use tunefeed_core::{
    Config, Recommender, ResolutionPipeline, Sampler, SanitizedConfig, TrackCatalog,
};

/// Shared application state.
///
/// Both external clients are injected as trait objects so tests can run the
/// whole HTTP surface against mocks.
pub struct AppState {
    config: Config,
    resolver: ResolutionPipeline,
    recommender: Arc<dyn Recommender>,
    catalog: Arc<dyn TrackCatalog>,
}

impl AppState {
    pub fn new(
        config: Config,
        recommender: Arc<dyn Recommender>,
        catalog: Arc<dyn TrackCatalog>,
    ) -> Self {
        let resolver = ResolutionPipeline::new(
            Arc::clone(&recommender),
            Arc::clone(&catalog),
            config.resolver.clone(),
        );

        Self {
            config,
            resolver,
            recommender,
            catalog,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn resolver(&self) -> &ResolutionPipeline {
        &self.resolver
    }

    pub fn recommender(&self) -> &dyn Recommender {
        self.recommender.as_ref()
    }

    pub fn catalog(&self) -> &dyn TrackCatalog {
        self.catalog.as_ref()
    }

    /// Fresh sampler per request; seeded when the config pins a seed.
    pub fn sampler(&self) -> Sampler {
        Sampler::for_seed(self.config.resolver.sample_seed)
    }

    pub fn resolution_cap(&self) -> usize {
        self.config.resolver.resolution_cap as usize
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.config.server.cors_origins
    }
}
