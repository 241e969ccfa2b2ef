//! In-process implementation of the repository traits, used by the test
//! suite and when the server runs without `DATABASE_URL`.

use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::repo::{TokenDenylist, UserRepo};
use crate::auth::repo_types::{DenylistEntry, NewUser, User};
use crate::employers::repo::EmployerRepo;
use crate::employers::repo_types::{Employer, EmployerChanges, EmployerFields};
use crate::error::StoreError;

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    employers: RwLock<Vec<Employer>>,
    denylist: RwLock<HashMap<Uuid, DenylistEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn employer_count(&self) -> usize {
        self.employers.read().await.len()
    }

    pub async fn denylist_len(&self) -> usize {
        self.denylist.read().await.len()
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, new: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == new.email) {
            return Err(StoreError::Duplicate("email"));
        }
        let user = User {
            id: Uuid::new_v4(),
            email: new.email,
            password_hash: new.password_hash,
            name: new.name,
            is_active: true,
            is_staff: false,
            is_email_verified: false,
            date_joined: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn update_name(&self, id: Uuid, name: &str) -> anyhow::Result<Option<User>> {
        let mut users = self.users.write().await;
        Ok(users.iter_mut().find(|u| u.id == id).map(|u| {
            u.name = name.to_string();
            u.clone()
        }))
    }
}

#[async_trait]
impl TokenDenylist for MemoryStore {
    async fn insert(&self, entry: DenylistEntry) -> anyhow::Result<bool> {
        let mut denylist = self.denylist.write().await;
        if denylist.contains_key(&entry.jti) {
            return Ok(false);
        }
        denylist.insert(entry.jti, entry);
        Ok(true)
    }

    async fn contains(&self, jti: Uuid) -> anyhow::Result<bool> {
        Ok(self.denylist.read().await.contains_key(&jti))
    }

    async fn purge_expired(&self, now: OffsetDateTime) -> anyhow::Result<u64> {
        let mut denylist = self.denylist.write().await;
        let before = denylist.len();
        denylist.retain(|_, e| e.expires_at >= now);
        Ok((before - denylist.len()) as u64)
    }
}

#[async_trait]
impl EmployerRepo for MemoryStore {
    async fn list_by_owner(&self, owner: Uuid) -> anyhow::Result<Vec<Employer>> {
        let employers = self.employers.read().await;
        Ok(employers.iter().filter(|e| e.user_id == owner).cloned().collect())
    }

    async fn get_owned(&self, owner: Uuid, id: Uuid) -> anyhow::Result<Option<Employer>> {
        let employers = self.employers.read().await;
        Ok(employers
            .iter()
            .find(|e| e.user_id == owner && e.id == id)
            .cloned())
    }

    async fn create(&self, owner: Uuid, fields: EmployerFields) -> anyhow::Result<Employer> {
        let now = OffsetDateTime::now_utc();
        let employer = Employer {
            id: Uuid::new_v4(),
            user_id: owner,
            company_name: fields.company_name,
            contact_person_name: fields.contact_person_name,
            email: fields.email,
            phone_number: fields.phone_number,
            address: fields.address,
            created_at: now,
            updated_at: now,
        };
        self.employers.write().await.push(employer.clone());
        Ok(employer)
    }

    async fn update_owned(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: EmployerChanges,
    ) -> anyhow::Result<Option<Employer>> {
        let mut employers = self.employers.write().await;
        Ok(employers
            .iter_mut()
            .find(|e| e.user_id == owner && e.id == id)
            .map(|e| {
                e.apply(changes);
                e.updated_at = OffsetDateTime::now_utc();
                e.clone()
            }))
    }

    async fn delete_owned(&self, owner: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let mut employers = self.employers.write().await;
        let before = employers.len();
        employers.retain(|e| !(e.user_id == owner && e.id == id));
        Ok(employers.len() < before)
    }
}
