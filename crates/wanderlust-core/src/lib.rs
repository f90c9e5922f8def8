pub mod app_config;
pub mod config;
pub mod criteria;
pub mod listings;
pub mod sanitize;

pub use app_config::{AppConfig, ClientConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, load_client_config};
pub use criteria::{PriceRange, SearchCriteria};
pub use listings::{ListingDetail, ListingId, ListingSummary};
pub use sanitize::sanitize_pattern;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
