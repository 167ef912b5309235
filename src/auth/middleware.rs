use crate::admission::{Gate, GateOutcome};
use crate::auth::jwt::TokenCodec;
use crate::errors::{AppError, Result};
use crate::observability::MetricsRecorder;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request},
    http::{header::AUTHORIZATION, request::Parts},
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

const BEARER_PREFIX: &str = "Bearer ";

/// Identity of the caller, attached to request extensions by [`AuthGate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

impl AuthenticatedUser {
    /// The subject as a user id. Subjects we did not mint are refused.
    pub fn owner_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.user_id).map_err(|_| {
            tracing::warn!(subject = %self.user_id, "Token subject is not a user id");
            AppError::Unauthorized
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header
fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_PREFIX))
}

/// Admission gate requiring a valid bearer token
pub struct AuthGate {
    codec: Arc<TokenCodec>,
}

impl AuthGate {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }
}

#[async_trait]
impl Gate for AuthGate {
    fn name(&self) -> &'static str {
        "auth"
    }

    async fn admit(&self, request: &mut Request) -> GateOutcome {
        let Some(token) = bearer_token(request) else {
            MetricsRecorder::record_auth_rejection("missing");
            return GateOutcome::Reject(AppError::MissingCredentials.into_response());
        };

        match self.codec.decode(token) {
            Ok(claim) => {
                request.extensions_mut().insert(AuthenticatedUser {
                    user_id: claim.subject,
                });
                GateOutcome::pass()
            }
            Err(e) => {
                // The reason stays in our logs; callers only ever see "unauthorized"
                tracing::debug!(reason = e.reason(), error = %e, "Token rejected");
                MetricsRecorder::record_auth_rejection(e.reason());
                GateOutcome::Reject(AppError::Unauthorized.into_response())
            }
        }
    }
}
