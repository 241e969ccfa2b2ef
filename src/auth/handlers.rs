use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{
            AccessTokenResponse, DetailResponse, LoginRequest, MessageResponse,
            ProfileResponse, ProfileUpdateRequest, RefreshTokenRequest, SignupRequest,
            TokenPairResponse,
        },
        extractors::AuthUser,
        services,
    },
    error::AppResult,
    extract::{AppJson, LenientJson},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/refresh", post(refresh))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new().route(
        "/auth/profile",
        get(get_profile).put(put_profile).patch(patch_profile),
    )
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SignupRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    services::signup(&state, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully",
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    LenientJson(payload): LenientJson<LoginRequest>,
) -> AppResult<Json<TokenPairResponse>> {
    let pair = services::login(&state, payload).await?;
    Ok(Json(TokenPairResponse {
        access: pair.access,
        refresh: pair.refresh,
    }))
}

#[instrument(skip(state, payload))]
pub async fn logout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    LenientJson(payload): LenientJson<RefreshTokenRequest>,
) -> AppResult<Json<DetailResponse>> {
    services::logout(&state, user_id, payload.refresh).await?;
    Ok(Json(DetailResponse {
        detail: "Successfully logged out.",
    }))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    LenientJson(payload): LenientJson<RefreshTokenRequest>,
) -> AppResult<Json<AccessTokenResponse>> {
    let access = services::refresh(&state, payload.refresh).await?;
    Ok(Json(AccessTokenResponse { access }))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<ProfileResponse>> {
    let user = services::current_user(&state, user_id).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn put_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<ProfileUpdateRequest>,
) -> AppResult<Json<ProfileResponse>> {
    let user = services::update_profile(&state, user_id, payload, true).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn patch_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<ProfileUpdateRequest>,
) -> AppResult<Json<ProfileResponse>> {
    let user = services::update_profile(&state, user_id, payload, false).await?;
    Ok(Json(user.into()))
}
