use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Deserialize;

use models::{user, Role};
use service::auth::domain::Identity;
use service::users;

use crate::errors::ApiError;
use crate::state::ServerState;

#[derive(Deserialize)]
pub struct UpdateProfileInput {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct ChangePasswordInput {
    pub old_password: String,
    pub new_password: String,
}

#[utoipa::path(get, path = "/users", tag = "users",
    responses(
        (status = 200, description = "All registered users"),
        (status = 403, description = "Caller is not an admin")))]
pub async fn list(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<user::Model>>, ApiError> {
    identity.require_role(Role::Admin)?;
    let all = users::list_users(&state.db).await?;
    Ok(Json(all))
}

#[utoipa::path(get, path = "/users/{user_id}", tag = "users",
    params(("user_id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User profile"),
        (status = 404, description = "No such user")))]
pub async fn get_one(
    State(state): State<ServerState>,
    Extension(_identity): Extension<Identity>,
    Path(user_id): Path<i64>,
) -> Result<Json<user::Model>, ApiError> {
    let found = users::get_user(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("user not found"))?;
    Ok(Json(found))
}

#[utoipa::path(put, path = "/users/me", tag = "users",
    request_body = crate::openapi::UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile"),
        (status = 400, description = "Invalid name or email")))]
pub async fn update_me(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Json(input): Json<UpdateProfileInput>,
) -> Result<Json<user::Model>, ApiError> {
    if let Some(email) = input.email.as_deref() {
        user::validate_email(email)?;
    }
    if let Some(name) = input.name.as_deref() {
        user::validate_name(name)?;
    }
    let updated = users::update_profile(
        &state.db,
        identity.id,
        input.name.as_deref(),
        input.email.as_deref(),
    )
    .await?;
    Ok(Json(updated))
}

#[utoipa::path(put, path = "/users/me/password", tag = "users",
    request_body = crate::openapi::ChangePasswordRequest,
    responses(
        (status = 200, description = "Password replaced"),
        (status = 400, description = "Current password wrong or new one invalid")))]
pub async fn change_password(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Json(input): Json<ChangePasswordInput>,
) -> Result<Json<serde_json::Value>, ApiError> {
    users::change_password(&state.db, identity.id, &input.old_password, &input.new_password)
        .await?;
    Ok(Json(serde_json::json!({ "detail": "password updated" })))
}

#[utoipa::path(delete, path = "/users/me", tag = "users",
    responses((status = 200, description = "Account removed")))]
pub async fn delete_me(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<serde_json::Value>, ApiError> {
    users::delete_account(&state.db, identity.id).await?;
    Ok(Json(serde_json::json!({ "detail": "account deleted" })))
}
