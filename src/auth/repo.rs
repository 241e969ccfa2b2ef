use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::{DenylistEntry, NewUser, User};
use crate::error::StoreError;

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    /// Fails with [`StoreError::Duplicate`] when the email is taken.
    async fn create(&self, new: NewUser) -> Result<User, StoreError>;
    async fn update_name(&self, id: Uuid, name: &str) -> anyhow::Result<Option<User>>;
}

/// Revoked refresh-token ids.
#[async_trait]
pub trait TokenDenylist: Send + Sync {
    /// Returns `false` if the jti was already present.
    async fn insert(&self, entry: DenylistEntry) -> anyhow::Result<bool>;
    async fn contains(&self, jti: Uuid) -> anyhow::Result<bool>;
    /// Drops entries whose token expired before `now`.
    async fn purge_expired(&self, now: OffsetDateTime) -> anyhow::Result<u64>;
}

const USER_COLUMNS: &str =
    "id, email, password_hash, name, is_active, is_staff, is_email_verified, date_joined";

#[derive(Clone)]
pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find user by id")?;
        Ok(user)
    }

    async fn create(&self, new: NewUser) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, email, password_hash, name)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.name)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return StoreError::Duplicate("email");
                }
            }
            StoreError::from(e)
        })
    }

    async fn update_name(&self, id: Uuid, name: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET name = $2 WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(name)
        .fetch_optional(&self.db)
        .await
        .context("update user name")?;
        Ok(user)
    }
}

#[derive(Clone)]
pub struct PgTokenDenylist {
    db: PgPool,
}

impl PgTokenDenylist {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TokenDenylist for PgTokenDenylist {
    async fn insert(&self, entry: DenylistEntry) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            INSERT INTO token_denylist (jti, user_id, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (jti) DO NOTHING
            "#,
        )
        .bind(entry.jti)
        .bind(entry.user_id)
        .bind(entry.expires_at)
        .execute(&self.db)
        .await
        .context("insert denylist entry")?;
        Ok(res.rows_affected() == 1)
    }

    async fn contains(&self, jti: Uuid) -> anyhow::Result<bool> {
        let found: Option<(Uuid,)> =
            sqlx::query_as("SELECT jti FROM token_denylist WHERE jti = $1")
                .bind(jti)
                .fetch_optional(&self.db)
                .await
                .context("lookup denylist entry")?;
        Ok(found.is_some())
    }

    async fn purge_expired(&self, now: OffsetDateTime) -> anyhow::Result<u64> {
        let res = sqlx::query("DELETE FROM token_denylist WHERE expires_at < $1")
            .bind(now)
            .execute(&self.db)
            .await
            .context("purge denylist")?;
        Ok(res.rows_affected())
    }
}
