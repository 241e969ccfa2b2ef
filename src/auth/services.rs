use tracing::{info, warn};
use uuid::Uuid;

use super::dto::{LoginRequest, ProfileUpdateRequest, SignupRequest};
use super::password::{hash_password, verify_dummy_password, verify_password};
use super::repo_types::{NewUser, User};
use super::tokens::{TokenPair, TokenServiceError};
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::validation::{normalize_email, FieldErrors, BLANK, READ_ONLY, REQUIRED};

pub const NAME_MAX_LEN: usize = 60;

impl From<TokenServiceError> for AppError {
    fn from(e: TokenServiceError) -> Self {
        match e {
            TokenServiceError::Token(e) => {
                warn!(error = %e, "refresh token rejected");
                AppError::InvalidToken
            }
            TokenServiceError::Internal(e) => AppError::Internal(e),
        }
    }
}

/// Registers a user. Nothing is written unless every field validates.
pub async fn signup(state: &AppState, req: SignupRequest) -> AppResult<User> {
    let mut errors = FieldErrors::new();

    let email = errors
        .required_email("email", req.email.as_deref().map(str::trim))
        .map(normalize_email);
    let name = errors.required("name", req.name.as_deref(), Some(NAME_MAX_LEN));
    let password = required_secret(&mut errors, "password", req.password.as_deref());
    let password2 = required_secret(&mut errors, "password2", req.password2.as_deref());

    if let (Some(p1), Some(p2)) = (password, password2) {
        if p1 != p2 {
            errors.add("password", "Password fields didn't match.");
        }
    }
    if let Some(email) = &email {
        if state.users.find_by_email(email).await?.is_some() {
            errors.add("email", "A user with this email already exists.");
        }
    }
    errors.into_result()?;

    // all three are Some once validation passed
    let (Some(email), Some(name), Some(password)) = (email, name, password) else {
        return Err(anyhow::anyhow!("signup validation let a field through").into());
    };

    let password_hash = hash_password(password)?;
    let user = state
        .users
        .create(NewUser {
            email,
            password_hash,
            name: name.to_string(),
        })
        .await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(user)
}

/// Passwords are taken verbatim: blank is rejected but no trimming happens.
fn required_secret<'a>(
    errors: &mut FieldErrors,
    field: &'static str,
    value: Option<&'a str>,
) -> Option<&'a str> {
    match value {
        None => {
            errors.add(field, REQUIRED);
            None
        }
        Some(v) if v.trim().is_empty() => {
            errors.add(field, BLANK);
            None
        }
        Some(v) => Some(v),
    }
}

/// Exchanges credentials for a token pair. Every failure, whatever the cause,
/// is the same `InvalidCredentials` so callers cannot probe which emails exist.
pub async fn login(state: &AppState, req: LoginRequest) -> AppResult<TokenPair> {
    let (Some(email), Some(password)) = (req.email, req.password) else {
        warn!("login with missing fields");
        return Err(AppError::InvalidCredentials);
    };
    let email = normalize_email(&email);

    let user = match state.users.find_by_email(&email).await? {
        Some(u) => u,
        None => {
            verify_dummy_password(&password);
            warn!(email = %email, "login unknown email");
            return Err(AppError::InvalidCredentials);
        }
    };

    if !verify_password(&password, &user.password_hash) {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }
    if !user.is_active {
        warn!(user_id = %user.id, "login for inactive user");
        return Err(AppError::InvalidCredentials);
    }

    let pair = state.tokens.issue_pair(user.id)?;
    info!(user_id = %user.id, "user logged in");
    Ok(pair)
}

/// Revokes the caller's refresh token. The access token used to authorize
/// this call is not revoked; it remains valid until it expires on its own.
pub async fn logout(state: &AppState, user_id: Uuid, refresh: Option<String>) -> AppResult<()> {
    let refresh = refresh
        .filter(|t| !t.trim().is_empty())
        .ok_or(AppError::MissingField("Refresh token"))?;
    state.tokens.blacklist(refresh.trim()).await?;
    info!(user_id = %user_id, "user logged out");
    Ok(())
}

/// Issues a fresh access token for a refresh token that has not been revoked.
pub async fn refresh(state: &AppState, refresh: Option<String>) -> AppResult<String> {
    let refresh = refresh
        .filter(|t| !t.trim().is_empty())
        .ok_or(AppError::MissingField("Refresh token"))?;
    let access = state.tokens.refresh_access(refresh.trim()).await?;
    Ok(access)
}

/// Loads the authenticated user; a token for a deleted or disabled account
/// no longer authenticates.
pub async fn current_user(state: &AppState, user_id: Uuid) -> AppResult<User> {
    match state.users.find_by_id(user_id).await? {
        Some(u) if u.is_active => Ok(u),
        Some(_) => Err(AppError::Unauthenticated("User is inactive.")),
        None => {
            warn!(user_id = %user_id, "token for unknown user");
            Err(AppError::Unauthenticated("User not found."))
        }
    }
}

/// Updates the mutable part of the profile (the name). `require_name` is set
/// for full replacement (`PUT`).
pub async fn update_profile(
    state: &AppState,
    user_id: Uuid,
    req: ProfileUpdateRequest,
    require_name: bool,
) -> AppResult<User> {
    let user = current_user(state, user_id).await?;

    let mut errors = FieldErrors::new();
    if req.email.is_some() {
        errors.add("email", READ_ONLY);
    }
    if req.password.is_some() {
        errors.add("password", READ_ONLY);
    }
    let name = match req.name.as_deref() {
        Some(n) => errors.present("name", n, Some(NAME_MAX_LEN)),
        None if require_name => errors.required("name", None, None),
        None => None,
    };
    errors.into_result()?;

    let Some(name) = name else {
        return Ok(user);
    };
    let updated = state
        .users
        .update_name(user.id, name)
        .await?
        .ok_or(AppError::Unauthenticated("User not found."))?;
    info!(user_id = %user_id, "profile updated");
    Ok(updated)
}
