//! Shared domain types, geo primitives, and configuration for nearbite.

pub mod app_config;
pub mod candidate;
pub mod config;
pub mod geo;

pub use app_config::{AppConfig, CacheSettings, SearchSettings};
pub use candidate::{derive_candidate_id, Candidate, Coordinate, PriceTier, SearchQuery};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{bounding_region, distance_meters, rounded_key, Region, DEDUP_KEY_PRECISION};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
