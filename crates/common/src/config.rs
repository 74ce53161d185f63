//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Voting rules configuration.
    #[serde(default)]
    pub vote: VoteConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Token required to issue new API keys. Issuing is disabled when unset.
    #[serde(default)]
    pub admin_token: Option<String>,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Longest accepted default answering window, in days.
pub const MAX_DURATION_DAYS: i64 = 36_500;

/// Voting rules configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct VoteConfig {
    /// Length of a question's answering window when no end date is supplied.
    /// Must be between 1 and [`MAX_DURATION_DAYS`].
    #[serde(default = "default_duration_days")]
    pub default_duration_days: i64,
}

impl Default for VoteConfig {
    fn default() -> Self {
        Self {
            default_duration_days: default_duration_days(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8000
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

const fn default_duration_days() -> i64 {
    30
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `.env` (if present)
    /// 2. `config/default.toml`
    /// 3. `config/{environment}.toml` (based on `QUESCHEETAH_ENV`)
    /// 4. Environment variables with `QUESCHEETAH__` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        let env =
            std::env::var("QUESCHEETAH_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("QUESCHEETAH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize::<Self>()?.validate()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("QUESCHEETAH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize::<Self>()?.validate()
    }

    /// Reject settings the services cannot run with.
    pub fn validate(self) -> Result<Self, config::ConfigError> {
        let days = self.vote.default_duration_days;
        if !(1..=MAX_DURATION_DAYS).contains(&days) {
            return Err(config::ConfigError::Message(format!(
                "vote.default_duration_days must be between 1 and {MAX_DURATION_DAYS}, got {days}"
            )));
        }
        Ok(self)
    }
}
