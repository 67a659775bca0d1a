//! Shared domain model and configuration for the dishrank workspace.

use thiserror::Error;

pub mod app_config;
pub mod config;
pub mod types;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use types::{
    AggregationResult, Candidate, Mention, PopularDish, Query, Review, VenueDetail,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
