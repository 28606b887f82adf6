//! Configuration management for the Villaflow core

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct IngestionConfig {
    /// Total write attempts before giving up (first try included).
    pub max_write_attempts: u32,
    /// Base delay for exponential backoff; attempt N waits 2^N * base.
    pub retry_base_delay_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MatchingConfig {
    /// Minimum Jaccard score accepted by the token-similarity strategy.
    pub similarity_threshold: f64,
    /// Name-based matches above this confidence win over an email match.
    pub name_confidence_floor: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TasksConfig {
    /// Bookings priced above this use the luxury template set.
    pub luxury_price_threshold: f64,
    /// Staff ids assigned when no property or keyword pool matches.
    pub default_staff_pool: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub ingestion: IngestionConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub tasks: TasksConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (with prefix VILLAFLOW_)
            .add_source(
                Environment::with_prefix("VILLAFLOW")
                    .separator("_")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ingestion: IngestionConfig::default(),
            matching: MatchingConfig::default(),
            tasks: TasksConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            max_write_attempts: 3,
            retry_base_delay_ms: 1000,
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.6,
            name_confidence_floor: 0.7,
        }
    }
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            luxury_price_threshold: 15000.0,
            default_staff_pool: vec!["staff_001".to_string(), "staff_002".to_string()],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
