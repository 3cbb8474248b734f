use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub recommender: RecommenderConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Browser origins allowed by CORS. Empty list means any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8889
}

/// Local recommendation sidecar configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecommenderConfig {
    /// Sidecar base URL (e.g., "http://127.0.0.1:5001")
    #[serde(default = "default_recommender_url")]
    pub base_url: String,
    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_recommender_timeout")]
    pub timeout_secs: u32,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            base_url: default_recommender_url(),
            timeout_secs: default_recommender_timeout(),
        }
    }
}

fn default_recommender_url() -> String {
    "http://127.0.0.1:5001".to_string()
}

fn default_recommender_timeout() -> u32 {
    10
}

/// External track catalog configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Catalog API base URL, overridable for testing.
    #[serde(default = "default_catalog_url")]
    pub base_url: String,
    /// Request timeout in seconds (default: 15)
    #[serde(default = "default_catalog_timeout")]
    pub timeout_secs: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_catalog_url(),
            timeout_secs: default_catalog_timeout(),
        }
    }
}

fn default_catalog_url() -> String {
    "https://api.spotify.com".to_string()
}

fn default_catalog_timeout() -> u32 {
    15
}

/// Resolution pipeline tuning
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Rounds of local-recommender attempts before the provider fallback.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay between failed rounds, in milliseconds.
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
    /// Candidates requested from the recommender per round. Requested above
    /// the final cap so catalog-match attrition still fills the list.
    #[serde(default = "default_request_count")]
    pub request_count: u32,
    /// Per-round catalog resolution attempts, and the final result cap.
    #[serde(default = "default_resolution_cap")]
    pub resolution_cap: u32,
    /// Fixed seed for sampling endpoints; random when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_seed: Option<u64>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
            request_count: default_request_count(),
            resolution_cap: default_resolution_cap(),
            sample_seed: None,
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_ms() -> u64 {
    1000
}

fn default_request_count() -> u32 {
    15
}

fn default_resolution_cap() -> u32 {
    10
}

/// Sanitized config for API responses
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub recommender: RecommenderConfig,
    pub catalog: SanitizedCatalogConfig,
    pub resolver: ResolverConfig,
}

/// Catalog config as exposed over the API.
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedCatalogConfig {
    pub base_url: String,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            recommender: config.recommender.clone(),
            catalog: SanitizedCatalogConfig {
                base_url: config.catalog.base_url.clone(),
                timeout_secs: config.catalog.timeout_secs,
            },
            resolver: config.resolver.clone(),
        }
    }
}
