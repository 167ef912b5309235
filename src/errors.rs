use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub enum AppError {
    // Database errors
    Database(sqlx::Error),
    DatabaseMigration(sqlx::migrate::MigrateError),

    // Redis errors
    Redis(redis::RedisError),

    // Authentication errors
    MissingCredentials,
    Unauthorized,
    InvalidCredentials,
    TokenGeneration(String),

    // User errors
    UserAlreadyExists,

    // Task errors
    TaskNotFound,
    TagNotFound,

    // Admission errors
    RateLimitExceeded(String),
    StoreUnavailable,

    // Validation errors
    ValidationError(String),

    // Configuration errors
    Configuration(String),

    // Cryptographic errors
    Cryptographic(String),

    // Internal errors
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Database(e) => write!(f, "Database error: {}", e),
            AppError::DatabaseMigration(e) => write!(f, "Database migration error: {}", e),
            AppError::Redis(e) => write!(f, "Redis error: {}", e),
            AppError::MissingCredentials => write!(f, "missing or invalid token"),
            AppError::Unauthorized => write!(f, "unauthorized"),
            AppError::InvalidCredentials => write!(f, "invalid credentials"),
            AppError::TokenGeneration(msg) => write!(f, "Token generation failed: {}", msg),
            AppError::UserAlreadyExists => write!(f, "user already exists"),
            AppError::TaskNotFound => write!(f, "task not found"),
            AppError::TagNotFound => write!(f, "tag not found"),
            AppError::RateLimitExceeded(msg) => write!(f, "{}", msg),
            AppError::StoreUnavailable => write!(f, "service unavailable"),
            AppError::ValidationError(msg) => write!(f, "{}", msg),
            AppError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Cryptographic(msg) => write!(f, "Cryptographic error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

// Convert from various error types
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err)
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::DatabaseMigration(err)
    }
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::Redis(err)
    }
}

impl AppError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingCredentials
            | AppError::Unauthorized
            | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::UserAlreadyExists => StatusCode::CONFLICT,
            AppError::TaskNotFound | AppError::TagNotFound => StatusCode::NOT_FOUND,
            AppError::RateLimitExceeded(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_)
            | AppError::DatabaseMigration(_)
            | AppError::Redis(_)
            | AppError::TokenGeneration(_)
            | AppError::Configuration(_)
            | AppError::Cryptographic(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Implement IntoResponse for Axum
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let error_message = match &self {
            AppError::Database(_) | AppError::DatabaseMigration(_) => {
                tracing::error!("Database error: {:?}", self);
                "Internal server error".to_string()
            }
            AppError::Redis(_) => {
                tracing::error!("Redis error: {:?}", self);
                "Internal server error".to_string()
            }
            AppError::TokenGeneration(_) => {
                tracing::error!("Token generation error: {:?}", self);
                "could not generate token".to_string()
            }
            AppError::Configuration(_) | AppError::Cryptographic(_) | AppError::Internal(_) => {
                tracing::error!("Internal error: {:?}", self);
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };

        let body = Json(json!({ "error": error_message }));

        (status, body).into_response()
    }
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;
