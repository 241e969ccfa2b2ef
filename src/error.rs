use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use crate::validation::FieldErrors;

/// Every failure a handler can return. Converted into a JSON body of the form
/// `{"error": <kind>, "detail": <message>}` at the handler boundary.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input.")]
    Validation(FieldErrors),

    #[error("Invalid Credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Unauthenticated(&'static str),

    #[error("Not found.")]
    NotFound,

    #[error("Invalid token.")]
    InvalidToken,

    #[error("{0} is required.")]
    MissingField(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::Unauthenticated(_) => "unauthenticated",
            AppError::NotFound => "not_found",
            AppError::InvalidToken => "invalid_token",
            AppError::MissingField(_) => "missing_field",
            AppError::BadRequest(_) => "bad_request",
            AppError::Internal(_) => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::InvalidToken
            | AppError::MissingField(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthenticated(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(field, message);
        AppError::Validation(errors)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::Validation(fields) => json!({
                "error": self.kind(),
                "detail": self.to_string(),
                "fields": fields,
            }),
            AppError::Internal(e) => {
                error!(error = ?e, "internal error");
                json!({
                    "error": self.kind(),
                    "detail": "Internal server error.",
                })
            }
            _ => json!({
                "error": self.kind(),
                "detail": self.to_string(),
            }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection, "rejected request body");
        AppError::BadRequest(rejection.body_text())
    }
}

/// Path parameters are record ids; anything unparseable cannot name a row.
impl From<PathRejection> for AppError {
    fn from(_: PathRejection) -> Self {
        AppError::NotFound
    }
}

/// Persistence failures that callers need to tell apart.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unique constraint violated on {0}")]
    Duplicate(&'static str),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Other(e.into())
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(field) => {
                AppError::validation(field, format!("A record with this {field} already exists."))
            }
            StoreError::Other(e) => AppError::Internal(e),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
