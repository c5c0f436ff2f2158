use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, MeResponse, RegisterRequest},
        extractors::AuthUser,
        services::{authenticate, hash_password, is_valid_email},
    },
    error::ApiError,
    state::AppState,
    users::{dto::PublicUser, repo::NewUser},
};

/// Role given to self-registered accounts.
const DEFAULT_ROLE: &str = "member";
const MIN_PASSWORD_LEN: usize = 8;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(error = %rejection, "unreadable login body");
            LoginRequest::default()
        }
    };

    let issued = authenticate(
        state.credentials.as_ref(),
        &state.keys,
        state.config.store_lookup_timeout(),
        &state.decoy_hash,
        request,
    )
    .await?;

    Ok(Json(issued.into()))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    let Json(payload) = payload.map_err(|rejection| {
        warn!(error = %rejection, "unreadable register body");
        ApiError::BadRequest("Invalid request body".into())
    })?;
    let email = payload.email.trim().to_lowercase();
    let full_name = payload.full_name.trim().to_string();

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(ApiError::BadRequest("Invalid email".into()));
    }
    if full_name.is_empty() {
        return Err(ApiError::BadRequest("Full name is required".into()));
    }
    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(ApiError::BadRequest("Password too short".into()));
    }

    let hash = hash_password(payload.password).await?;

    let user = state
        .users
        .create(NewUser {
            full_name,
            email: email.clone(),
            password_hash: hash,
            role: DEFAULT_ROLE.into(),
        })
        .await
        .inspect_err(|e| warn!(email = %email, error = %e, "registration failed"))?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip_all)]
pub async fn get_me(AuthUser(claims): AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        email: claims.sub,
        role: claims.role,
        expires_at: claims.exp,
    })
}
