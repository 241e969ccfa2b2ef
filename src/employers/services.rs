use tracing::{info, warn};
use uuid::Uuid;

use super::dto::EmployerPayload;
use super::repo_types::{Employer, EmployerChanges, EmployerFields};
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::validation::FieldErrors;

const COMPANY_NAME_MAX: usize = 255;
const CONTACT_NAME_MAX: usize = 255;
const PHONE_MAX: usize = 20;

/// Authorization predicate checked before any mutation.
pub fn owns(user_id: Uuid, employer: &Employer) -> bool {
    employer.user_id == user_id
}

/// Validates a payload where every field must be present.
pub fn validate_full(p: &EmployerPayload) -> AppResult<EmployerFields> {
    let mut errors = FieldErrors::new();
    let company_name = errors.required(
        "company_name",
        p.company_name.as_deref(),
        Some(COMPANY_NAME_MAX),
    );
    let contact_person_name = errors.required(
        "contact_person_name",
        p.contact_person_name.as_deref(),
        Some(CONTACT_NAME_MAX),
    );
    let email = errors.required_email("email", p.email.as_deref());
    let phone_number = errors.required("phone_number", p.phone_number.as_deref(), Some(PHONE_MAX));
    let address = errors.required("address", p.address.as_deref(), None);
    errors.into_result()?;

    match (company_name, contact_person_name, email, phone_number, address) {
        (Some(c), Some(n), Some(e), Some(ph), Some(a)) => Ok(EmployerFields {
            company_name: c.to_string(),
            contact_person_name: n.to_string(),
            email: e.to_string(),
            phone_number: ph.to_string(),
            address: a.to_string(),
        }),
        _ => Err(anyhow::anyhow!("employer validation let a field through").into()),
    }
}

/// Validates only the fields that were supplied.
pub fn validate_partial(p: &EmployerPayload) -> AppResult<EmployerChanges> {
    let mut errors = FieldErrors::new();
    let mut changes = EmployerChanges::default();

    if let Some(v) = p.company_name.as_deref() {
        changes.company_name = errors
            .present("company_name", v, Some(COMPANY_NAME_MAX))
            .map(str::to_string);
    }
    if let Some(v) = p.contact_person_name.as_deref() {
        changes.contact_person_name = errors
            .present("contact_person_name", v, Some(CONTACT_NAME_MAX))
            .map(str::to_string);
    }
    if let Some(v) = p.email.as_deref() {
        changes.email = errors
            .present("email", v, None)
            .and_then(|v| errors.email_format("email", v))
            .map(str::to_string);
    }
    if let Some(v) = p.phone_number.as_deref() {
        changes.phone_number = errors
            .present("phone_number", v, Some(PHONE_MAX))
            .map(str::to_string);
    }
    if let Some(v) = p.address.as_deref() {
        changes.address = errors.present("address", v, None).map(str::to_string);
    }
    errors.into_result()?;
    Ok(changes)
}

pub async fn list(state: &AppState, user_id: Uuid) -> AppResult<Vec<Employer>> {
    Ok(state.employers.list_by_owner(user_id).await?)
}

pub async fn create(state: &AppState, user_id: Uuid, p: EmployerPayload) -> AppResult<Employer> {
    let fields = validate_full(&p)?;
    let employer = state.employers.create(user_id, fields).await?;
    info!(user_id = %user_id, employer_id = %employer.id, "employer created");
    Ok(employer)
}

/// Looks `id` up inside the caller's own rows. Rows owned by someone else are
/// reported as missing, never as forbidden.
pub async fn get(state: &AppState, user_id: Uuid, id: Uuid) -> AppResult<Employer> {
    let employer = state
        .employers
        .get_owned(user_id, id)
        .await?
        .ok_or(AppError::NotFound)?;
    if !owns(user_id, &employer) {
        warn!(user_id = %user_id, employer_id = %id, "scoped lookup returned foreign row");
        return Err(AppError::NotFound);
    }
    Ok(employer)
}

/// `partial` selects PATCH semantics; otherwise every field is required.
pub async fn update(
    state: &AppState,
    user_id: Uuid,
    id: Uuid,
    p: EmployerPayload,
    partial: bool,
) -> AppResult<Employer> {
    let existing = get(state, user_id, id).await?;
    let changes = if partial {
        validate_partial(&p)?
    } else {
        validate_full(&p)?.into()
    };
    let employer = state
        .employers
        .update_owned(user_id, existing.id, changes)
        .await?
        .ok_or(AppError::NotFound)?;
    info!(user_id = %user_id, employer_id = %id, partial, "employer updated");
    Ok(employer)
}

pub async fn delete(state: &AppState, user_id: Uuid, id: Uuid) -> AppResult<()> {
    let existing = get(state, user_id, id).await?;
    if !state.employers.delete_owned(user_id, existing.id).await? {
        return Err(AppError::NotFound);
    }
    info!(user_id = %user_id, employer_id = %id, "employer deleted");
    Ok(())
}
