use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::dto::{ListUsersQuery, PublicUser, UpdateUserRequest};
use crate::{
    auth::extractors::{AdminUser, AuthUser},
    error::ApiError,
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route(
            "/users/:id",
            get(get_user).patch(update_user).delete(delete_user),
        )
}

fn user_id(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, ApiError> {
    path.map(|Path(id)| id).map_err(|rejection| {
        warn!(error = %rejection, "bad user id");
        ApiError::BadRequest("Invalid user id".into())
    })
}

fn not_found() -> ApiError {
    ApiError::NotFound("User not found".into())
}

#[instrument(skip(state, _caller))]
pub async fn list_users(
    State(state): State<AppState>,
    _caller: AuthUser,
    Query(q): Query<ListUsersQuery>,
) -> Result<Json<Vec<PublicUser>>, ApiError> {
    let role = q.role.as_deref().map(str::trim).filter(|r| !r.is_empty());
    let users = state.users.list(role).await?;
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

#[instrument(skip(state, _caller, path))]
pub async fn get_user(
    State(state): State<AppState>,
    _caller: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<PublicUser>, ApiError> {
    let id = user_id(path)?;
    state
        .users
        .find_by_id(id)
        .await?
        .map(|u| Json(u.into()))
        .ok_or_else(not_found)
}

#[instrument(skip(state, admin, path, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    admin: AdminUser,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<PublicUser>, ApiError> {
    let id = user_id(path)?;
    let Json(payload) = payload.map_err(|rejection| {
        warn!(error = %rejection, "unreadable update body");
        ApiError::BadRequest("Invalid request body".into())
    })?;
    let changes = payload
        .into_changes()
        .map_err(|msg| ApiError::BadRequest(msg.into()))?;

    let user = state.users.update(id, changes).await?.ok_or_else(not_found)?;
    info!(user_id = %id, role = %user.role, by = %admin.0.sub, "user updated");
    Ok(Json(user.into()))
}

#[instrument(skip(state, admin, path))]
pub async fn delete_user(
    State(state): State<AppState>,
    admin: AdminUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = user_id(path)?;
    if !state.users.delete(id).await? {
        return Err(not_found());
    }
    info!(user_id = %id, by = %admin.0.sub, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
