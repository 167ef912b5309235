use crate::errors::{AppError, Result};
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub auth: AuthConfig,
    pub rate_limit: RateLimitConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    pub connection_timeout_seconds: u64,
}

#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_expiration_seconds: i64,
    pub password_min_length: usize,
}

// Keep the signing secret out of logs
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_expiration_seconds", &self.token_expiration_seconds)
            .field("password_min_length", &self.password_min_length)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub limit: u64,
    pub window_seconds: u64,
    pub error_message: String,
    pub store_timeout_ms: u64,
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_seconds)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub log_format: String,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let environment = env::var("TASKFLOW_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(
                config::File::with_name(&format!("config/{}", environment)).required(false),
            )
            // e.g., TASKFLOW__RATE_LIMIT__LIMIT=100
            .add_source(
                config::Environment::with_prefix("TASKFLOW")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::Configuration(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::Configuration(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::Configuration("Invalid port number".to_string()));
        }

        if self.database.url.is_empty() {
            return Err(AppError::Configuration(
                "Database URL is required".to_string(),
            ));
        }

        if self.redis.url.is_empty() {
            return Err(AppError::Configuration("Redis URL is required".to_string()));
        }

        if self.auth.jwt_secret.len() < 32 {
            return Err(AppError::Configuration(
                "JWT secret must be at least 32 characters long".to_string(),
            ));
        }

        if self.auth.token_expiration_seconds <= 0 {
            return Err(AppError::Configuration(
                "Token expiration must be positive".to_string(),
            ));
        }

        if self.auth.password_min_length < 8 {
            return Err(AppError::Configuration(
                "Password min length must be at least 8".to_string(),
            ));
        }

        if self.rate_limit.enabled {
            if self.rate_limit.limit == 0 || self.rate_limit.window_seconds == 0 {
                return Err(AppError::Configuration(
                    "Rate limit and window must be non-zero when rate limiting is enabled"
                        .to_string(),
                ));
            }
            if self.rate_limit.store_timeout_ms == 0 {
                return Err(AppError::Configuration(
                    "Rate limit store timeout must be non-zero".to_string(),
                ));
            }
        }

        Ok(())
    }
}
