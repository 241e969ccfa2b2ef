use axum::{
    extract::{OriginalUri, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::extractors::AuthUser,
    error::AppResult,
    extract::{AppJson, AppPath},
    state::AppState,
};

use super::dto::{EmployerPayload, EmployerResponse};
use super::services;

pub fn employer_routes() -> Router<AppState> {
    Router::new()
        .route("/employers", get(list_employers).post(create_employer))
        .route(
            "/employers/:id",
            get(get_employer)
                .put(put_employer)
                .patch(patch_employer)
                .delete(delete_employer),
        )
}

#[instrument(skip(state))]
pub async fn list_employers(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<EmployerResponse>>> {
    let rows = services::list(&state, user_id).await?;
    Ok(Json(rows.into_iter().map(EmployerResponse::from).collect()))
}

#[instrument(skip(state, payload))]
pub async fn create_employer(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    OriginalUri(uri): OriginalUri,
    AppJson(payload): AppJson<EmployerPayload>,
) -> AppResult<(StatusCode, HeaderMap, Json<EmployerResponse>)> {
    let employer = services::create(&state, user_id, payload).await?;

    // keeps the `/api` prefix when posted there
    let location = format!("{}/{}", uri.path().trim_end_matches('/'), employer.id);
    let mut headers = HeaderMap::new();
    if let Ok(location) = HeaderValue::from_str(&location) {
        headers.insert(header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(employer.into())))
}

#[instrument(skip(state))]
pub async fn get_employer(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<EmployerResponse>> {
    let employer = services::get(&state, user_id, id).await?;
    Ok(Json(employer.into()))
}

#[instrument(skip(state, payload))]
pub async fn put_employer(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<EmployerPayload>,
) -> AppResult<Json<EmployerResponse>> {
    let employer = services::update(&state, user_id, id, payload, false).await?;
    Ok(Json(employer.into()))
}

#[instrument(skip(state, payload))]
pub async fn patch_employer(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<EmployerPayload>,
) -> AppResult<Json<EmployerResponse>> {
    let employer = services::update(&state, user_id, id, payload, true).await?;
    Ok(Json(employer.into()))
}

#[instrument(skip(state))]
pub async fn delete_employer(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<StatusCode> {
    services::delete(&state, user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
