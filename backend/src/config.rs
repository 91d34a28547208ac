//! Configuration management for the Farm Ledger
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with FARM_ prefix

use std::path::PathBuf;

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Data file configuration
    pub storage: StorageConfig,

    /// Password hashing configuration
    pub auth: AuthConfig,

    /// Report export configuration
    pub report: ReportConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// JSON document holding every collection
    pub data_file: PathBuf,

    /// Populate a missing data file with the demo farm
    pub seed_demo_data: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// bcrypt work factor (4-31)
    pub bcrypt_cost: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    /// Directory reports are written to when no explicit path is given
    pub output_dir: PathBuf,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("FARM_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("storage.data_file", "data/farm-ledger.json")?
            .set_default("storage.seed_demo_data", true)?
            .set_default("auth.bcrypt_cost", i64::from(bcrypt::DEFAULT_COST))?
            .set_default("report.output_dir", "reports")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (FARM_ prefix)
            .add_source(
                Environment::with_prefix("FARM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
