use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::claims::{Claims, TokenKind};
use super::jwt::{JwtKeys, TokenError};
use super::repo::TokenDenylist;
use super::repo_types::DenylistEntry;

#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Failure of a token operation: either the token itself was refused, or the
/// denylist could not be consulted.
#[derive(Debug, thiserror::Error)]
pub enum TokenServiceError {
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Issues access/refresh pairs and tracks revoked refresh tokens.
///
/// Refresh tokens move `Issued -> Active -> Blacklisted`; the last state is
/// terminal. Access tokens are never recorded anywhere, so revoking a refresh
/// token does not cut short an access token already handed out: it stays
/// usable until its own (short) expiry.
#[derive(Clone)]
pub struct TokenService {
    keys: JwtKeys,
    denylist: Arc<dyn TokenDenylist>,
}

impl TokenService {
    pub fn new(keys: JwtKeys, denylist: Arc<dyn TokenDenylist>) -> Self {
        Self { keys, denylist }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    pub fn issue_pair(&self, user_id: Uuid) -> anyhow::Result<TokenPair> {
        let (access, _) = self.keys.sign(user_id, TokenKind::Access)?;
        let (refresh, _) = self.keys.sign(user_id, TokenKind::Refresh)?;
        Ok(TokenPair { access, refresh })
    }

    pub fn verify_access(&self, token: &str) -> Result<Uuid, TokenError> {
        self.keys
            .verify_kind(token, TokenKind::Access)
            .map(|claims| claims.sub)
    }

    /// Verifies a refresh token and checks it has not been revoked.
    pub async fn verify_refresh(&self, token: &str) -> Result<Claims, TokenServiceError> {
        let claims = self.keys.verify_kind(token, TokenKind::Refresh)?;
        if self.is_blacklisted(claims.jti).await? {
            return Err(TokenError::Revoked.into());
        }
        Ok(claims)
    }

    /// Revokes a refresh token. Fails if the token does not verify or was
    /// already revoked.
    pub async fn blacklist(&self, token: &str) -> Result<(), TokenServiceError> {
        let claims = self.verify_refresh(token).await?;
        let expires_at = OffsetDateTime::from_unix_timestamp(claims.exp as i64)
            .map_err(|_| TokenError::Malformed)?;
        let inserted = self
            .denylist
            .insert(DenylistEntry {
                jti: claims.jti,
                user_id: claims.sub,
                expires_at,
            })
            .await?;
        // a concurrent revocation of the same token won the insert
        if !inserted {
            return Err(TokenError::Revoked.into());
        }
        info!(user_id = %claims.sub, jti = %claims.jti, "refresh token blacklisted");
        Ok(())
    }

    pub async fn is_blacklisted(&self, jti: Uuid) -> anyhow::Result<bool> {
        self.denylist.contains(jti).await
    }

    /// Mints a new access token from a live refresh token.
    pub async fn refresh_access(&self, token: &str) -> Result<String, TokenServiceError> {
        let claims = self.verify_refresh(token).await?;
        let (access, _) = self.keys.sign(claims.sub, TokenKind::Access)?;
        Ok(access)
    }

    pub async fn purge_expired(&self) -> anyhow::Result<u64> {
        let purged = self.denylist.purge_expired(OffsetDateTime::now_utc()).await?;
        if purged > 0 {
            info!(purged, "expired denylist entries removed");
        }
        Ok(purged)
    }
}

/// Periodically drops denylist entries for tokens that have expired anyway.
pub async fn run_denylist_purge(tokens: TokenService, every: std::time::Duration) {
    let mut ticker = tokio::time::interval(every);
    loop {
        ticker.tick().await;
        if let Err(e) = tokens.purge_expired().await {
            warn!(error = %e, "denylist purge failed");
        }
    }
}
