//! Configuration management for the Cultivation Planner
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with CPL__ prefix

use config::builder::{ConfigBuilder, DefaultState};
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

    /// JWT authentication configuration
    pub jwt: JwtConfig,

    /// AI crop lookup service; lookups are disabled when absent
    pub crop_lookup: Option<CropLookupConfig>,

    /// Defaults for the nutrition view
    pub planning: PlanningConfig,
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
    /// PostgreSQL connection URL. Empty selects the in-memory plan store.
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

impl DatabaseConfig {
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Secret the identity provider signs access tokens with
    pub secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CropLookupConfig {
    /// Crop lookup API endpoint
    pub api_endpoint: String,

    /// Crop lookup API key
    pub api_key: String,

    /// Request timeout in seconds
    #[serde(default = "default_lookup_timeout")]
    pub timeout_secs: u64,
}

fn default_lookup_timeout() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlanningConfig {
    /// Household size used when a request does not give one
    pub default_household_size: i32,

    /// Period in days used when a request does not give one
    pub default_period_days: i32,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("CPL_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = Self::defaults(&environment)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (CPL__ prefix)
            .add_source(
                Environment::with_prefix("CPL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Builder seeded with the in-code defaults
    fn defaults(environment: &str) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let server = ServerConfig::default();
        let planning = PlanningConfig::default();

        config::Config::builder()
            .set_default("environment", environment)?
            .set_default("server.port", i64::from(server.port))?
            .set_default("server.host", server.host)?
            .set_default("database.url", "")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("jwt.secret", "development-secret-key")?
            .set_default(
                "planning.default_household_size",
                i64::from(planning.default_household_size),
            )?
            .set_default(
                "planning.default_period_days",
                i64::from(planning.default_period_days),
            )
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

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            default_household_size: 1,
            default_period_days: 365,
        }
    }
}
