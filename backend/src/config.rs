//! Configuration management for the Krishi Sahayi platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with KRISHI prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::insights::{default_seasonal_rules, SeasonalRule};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Weather API configuration
    pub weather: WeatherConfig,

    /// AI completion API configuration
    pub ai: AiConfig,

    /// Market insight configuration
    pub market: MarketConfig,

    /// Upload limits
    pub uploads: UploadConfig,
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
pub struct WeatherConfig {
    /// Weather API endpoint
    pub api_endpoint: String,

    /// Weather API key. Without one the fallback report is served.
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AiConfig {
    /// Chat completions endpoint base URL
    pub api_endpoint: String,

    /// API key. Without one the advisor endpoints are unavailable.
    pub api_key: Option<String>,

    /// Model name sent with every completion request
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MarketConfig {
    /// Price rows read per crop, newest first
    pub history_limit: i64,

    /// Insights returned by the combined insights endpoint
    pub insight_limit: usize,

    /// Markets filled in by the price simulation
    pub tracked_markets: Vec<String>,

    /// Seasonal insight table
    #[serde(default = "default_seasonal_rules")]
    pub seasonal_rules: Vec<SeasonalRule>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    /// Largest accepted plant image in bytes
    pub max_image_bytes: usize,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("KRISHI_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 5000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("weather.api_endpoint", "https://api.openweathermap.org/data/2.5")?
            .set_default("ai.api_endpoint", "https://api.openai.com/v1")?
            .set_default("ai.model", "gpt-5")?
            .set_default("ai.timeout_secs", 60)?
            .set_default("market.history_limit", 10)?
            .set_default("market.insight_limit", 4)?
            .set_default(
                "market.tracked_markets",
                vec!["Kochi", "Trivandrum", "Kozhikode", "Kannur", "Palakkad"],
            )?
            .set_default("uploads.max_image_bytes", 10 * 1024 * 1024)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (KRISHI prefix)
            .add_source(
                Environment::with_prefix("KRISHI")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("market.tracked_markets")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            host: "0.0.0.0".to_string(),
        }
    }
}
