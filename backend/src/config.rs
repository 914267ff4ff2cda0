//! Configuration management for the Stock Ledger Reporting service
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with SLR_ prefix

use std::path::PathBuf;

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Report output configuration
    pub reports: ReportsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportsConfig {
    /// Printed in the default report title
    pub company_name: String,

    /// PNG or JPEG drawn in the title block of page 1
    #[serde(default)]
    pub logo_path: Option<PathBuf>,

    /// When set, every rendered PDF is also written here
    #[serde(default)]
    pub archive_dir: Option<PathBuf>,

    /// Signature slots in the footer of the last page
    pub signature_labels: Vec<String>,

    /// Page preset used when a request names none
    pub default_preset: String,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("SLR_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("reports.company_name", "Stores Department")?
            .set_default("reports.signature_labels", vec!["Prepared by", "Checked by", "Approved by"])?
            .set_default("reports.default_preset", "a4_portrait")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (SLR_ prefix)
            .add_source(
                Environment::with_prefix("SLR")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("reports.signature_labels")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        shared::validate_preset(&config.reports.default_preset)
            .map_err(|e| ConfigError::Message(format!("reports.default_preset: {}", e)))?;
        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            company_name: "Stores Department".to_string(),
            logo_path: None,
            archive_dir: None,
            signature_labels: vec![
                "Prepared by".to_string(),
                "Checked by".to_string(),
                "Approved by".to_string(),
            ],
            default_preset: "a4_portrait".to_string(),
        }
    }
}
