use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String, // Argon2 PHC string, never serialized
    pub name: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_email_verified: bool,
    pub date_joined: OffsetDateTime,
}

/// Values needed to insert a user; flags take their signup defaults.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
}

/// A revoked refresh token.
#[derive(Debug, Clone, FromRow)]
pub struct DenylistEntry {
    pub jti: Uuid,
    pub user_id: Uuid,
    pub expires_at: OffsetDateTime,
}
