use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Employer {
    pub id: Uuid,
    pub user_id: Uuid, // owner
    pub company_name: String,
    pub contact_person_name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Validated values for a new employer or a full replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployerFields {
    pub company_name: String,
    pub contact_person_name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
}

/// Validated partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployerChanges {
    pub company_name: Option<String>,
    pub contact_person_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

impl From<EmployerFields> for EmployerChanges {
    fn from(f: EmployerFields) -> Self {
        Self {
            company_name: Some(f.company_name),
            contact_person_name: Some(f.contact_person_name),
            email: Some(f.email),
            phone_number: Some(f.phone_number),
            address: Some(f.address),
        }
    }
}

impl Employer {
    pub fn apply(&mut self, changes: EmployerChanges) {
        if let Some(v) = changes.company_name {
            self.company_name = v;
        }
        if let Some(v) = changes.contact_person_name {
            self.contact_person_name = v;
        }
        if let Some(v) = changes.email {
            self.email = v;
        }
        if let Some(v) = changes.phone_number {
            self.phone_number = v;
        }
        if let Some(v) = changes.address {
            self.address = v;
        }
    }
}
