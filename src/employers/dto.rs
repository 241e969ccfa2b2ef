use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::Employer;

/// Body for create, full replace and partial update. The owner is never read
/// from the client; unknown fields such as `user` are dropped.
#[derive(Debug, Default, Deserialize)]
pub struct EmployerPayload {
    pub company_name: Option<String>,
    pub contact_person_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EmployerResponse {
    pub id: Uuid,
    pub company_name: String,
    pub contact_person_name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Employer> for EmployerResponse {
    fn from(e: Employer) -> Self {
        Self {
            id: e.id,
            company_name: e.company_name,
            contact_person_name: e.contact_person_name,
            email: e.email,
            phone_number: e.phone_number,
            address: e.address,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}
