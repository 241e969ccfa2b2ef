use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use super::claims::TokenKind;
use super::jwt::{JwtKeys, TokenError};
use crate::error::AppError;

/// Extracts and validates the bearer access token, yielding the user ID.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AppError::Unauthenticated(
                "Authentication credentials were not provided.",
            ))?;

        // Expect "Bearer <token>"
        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AppError::Unauthenticated("Invalid Authorization header."))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify_kind(token, TokenKind::Access).map_err(|e| {
            warn!(error = %e, "access token rejected");
            AppError::Unauthenticated(match e {
                TokenError::Expired => "Token has expired.",
                TokenError::InvalidSignature => "Token signature is invalid.",
                TokenError::WrongKind => "Access token required.",
                TokenError::Malformed | TokenError::Revoked => "Token is invalid.",
            })
        })?;

        Ok(AuthUser(claims.sub))
    }
}
