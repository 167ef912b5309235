// JWT issuing and verification

use crate::config::AuthConfig;
use crate::errors::{AppError, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The only signing algorithm accepted or produced
const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Why a token was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("invalid token: {0}")]
    Invalid(String),
    #[error("token has expired")]
    Expired,
}

impl TokenError {
    /// Short label used for logs and metrics
    pub fn reason(&self) -> &'static str {
        match self {
            TokenError::Invalid(_) => "invalid",
            TokenError::Expired => "expired",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid(err.to_string()),
        }
    }
}

/// Wire claims. `sub` stays optional so a missing subject surfaces as our error,
/// not as a serde failure with a different message.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sub: Option<String>,
    exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    iat: Option<i64>,
}

/// Caller identity recovered from a verified token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaim {
    pub subject: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies HS256 bearer tokens with a shared secret
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_lifetime: Duration,
}

impl TokenCodec {
    pub fn new(secret: &[u8], token_lifetime: Duration) -> Self {
        // Restricting to one algorithm makes `alg` confusion a hard failure
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            token_lifetime,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.jwt_secret.as_bytes(),
            Duration::seconds(config.token_expiration_seconds),
        )
    }

    /// Issue a token for `subject` valid for the configured lifetime
    pub fn issue(&self, subject: &str) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: Some(subject.to_string()),
            exp: (now + self.token_lifetime).timestamp(),
            iat: Some(now.timestamp()),
        };

        encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AppError::TokenGeneration(format!("Failed to encode JWT: {}", e)))
    }

    /// Verify the signature and expiry of `token` and extract its identity
    pub fn decode(&self, token: &str) -> std::result::Result<IdentityClaim, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        let claims = data.claims;

        let subject = claims
            .sub
            .filter(|s| !s.is_empty())
            .ok_or_else(|| TokenError::Invalid("missing subject".to_string()))?;

        let expires_at = DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| TokenError::Invalid("expiry out of range".to_string()))?;

        Ok(IdentityClaim {
            subject,
            expires_at,
        })
    }
}
