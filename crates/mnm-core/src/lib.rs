//! Shared configuration for the market news monitor.
//!
//! Loads [`AppConfig`] from the process environment and the optional
//! company-site catalogue used by the official-channel news source.

mod app_config;
mod config;
mod sites;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use sites::{default_company_sites, load_company_sites, CompanySite, CompanySitesFile};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read company sites file {path}: {source}")]
    SitesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse company sites file: {0}")]
    SitesFileParse(#[from] serde_yaml::Error),

    #[error("company sites validation error: {0}")]
    Validation(String),
}
