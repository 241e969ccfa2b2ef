use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Employer, EmployerChanges, EmployerFields};

/// Employer persistence. Every lookup is scoped to the owning user.
#[async_trait]
pub trait EmployerRepo: Send + Sync {
    async fn list_by_owner(&self, owner: Uuid) -> anyhow::Result<Vec<Employer>>;
    async fn get_owned(&self, owner: Uuid, id: Uuid) -> anyhow::Result<Option<Employer>>;
    async fn create(&self, owner: Uuid, fields: EmployerFields) -> anyhow::Result<Employer>;
    async fn update_owned(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: EmployerChanges,
    ) -> anyhow::Result<Option<Employer>>;
    /// Returns `false` when no owned row matched.
    async fn delete_owned(&self, owner: Uuid, id: Uuid) -> anyhow::Result<bool>;
}

const EMPLOYER_COLUMNS: &str = "id, user_id, company_name, contact_person_name, email, \
     phone_number, address, created_at, updated_at";

#[derive(Clone)]
pub struct PgEmployerRepo {
    db: PgPool,
}

impl PgEmployerRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EmployerRepo for PgEmployerRepo {
    async fn list_by_owner(&self, owner: Uuid) -> anyhow::Result<Vec<Employer>> {
        let rows = sqlx::query_as::<_, Employer>(&format!(
            r#"
            SELECT {EMPLOYER_COLUMNS}
            FROM employers
            WHERE user_id = $1
            ORDER BY created_at ASC, id ASC
            "#
        ))
        .bind(owner)
        .fetch_all(&self.db)
        .await
        .context("list employers")?;
        Ok(rows)
    }

    async fn get_owned(&self, owner: Uuid, id: Uuid) -> anyhow::Result<Option<Employer>> {
        let row = sqlx::query_as::<_, Employer>(&format!(
            "SELECT {EMPLOYER_COLUMNS} FROM employers WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await
        .context("get employer")?;
        Ok(row)
    }

    async fn create(&self, owner: Uuid, fields: EmployerFields) -> anyhow::Result<Employer> {
        let row = sqlx::query_as::<_, Employer>(&format!(
            r#"
            INSERT INTO employers
                (id, user_id, company_name, contact_person_name, email, phone_number, address)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {EMPLOYER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(&fields.company_name)
        .bind(&fields.contact_person_name)
        .bind(&fields.email)
        .bind(&fields.phone_number)
        .bind(&fields.address)
        .fetch_one(&self.db)
        .await
        .context("insert employer")?;
        Ok(row)
    }

    async fn update_owned(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: EmployerChanges,
    ) -> anyhow::Result<Option<Employer>> {
        let row = sqlx::query_as::<_, Employer>(&format!(
            r#"
            UPDATE employers SET
                company_name        = COALESCE($3, company_name),
                contact_person_name = COALESCE($4, contact_person_name),
                email               = COALESCE($5, email),
                phone_number        = COALESCE($6, phone_number),
                address             = COALESCE($7, address),
                updated_at          = now()
            WHERE id = $1 AND user_id = $2
            RETURNING {EMPLOYER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(owner)
        .bind(changes.company_name)
        .bind(changes.contact_person_name)
        .bind(changes.email)
        .bind(changes.phone_number)
        .bind(changes.address)
        .fetch_optional(&self.db)
        .await
        .context("update employer")?;
        Ok(row)
    }

    async fn delete_owned(&self, owner: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM employers WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.db)
            .await
            .context("delete employer")?;
        Ok(res.rows_affected() > 0)
    }
}
