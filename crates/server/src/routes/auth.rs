use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use service::auth::domain::{LoginInput, RegisterInput};
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::AuthService;

use crate::errors::ApiError;
use crate::state::ServerState;

fn auth_service(state: &ServerState) -> AuthService<SeaOrmAuthRepository> {
    AuthService::new(
        Arc::new(SeaOrmAuthRepository { db: state.db.clone() }),
        Arc::clone(&state.tokens),
    )
}

#[derive(Serialize)]
pub struct RegisterOutput {
    pub user_id: i64,
    pub email: String,
}

#[derive(Serialize)]
pub struct LoginOutput {
    pub access_token: String,
    pub token_type: &'static str,
}

#[derive(Deserialize)]
pub struct ForgotPasswordInput {
    pub email: String,
}

#[derive(Serialize)]
pub struct ForgotPasswordOutput {
    pub reset_token: String,
}

#[derive(Deserialize)]
pub struct ResetPasswordInput {
    pub token: String,
    pub new_password: String,
}

#[utoipa::path(post, path = "/auth/register", tag = "auth",
    request_body = crate::openapi::RegisterRequest,
    responses(
        (status = 200, description = "Registered"),
        (status = 400, description = "Invalid email, name, password or role"),
        (status = 409, description = "Email already registered")))]
pub async fn register(
    State(state): State<ServerState>,
    Json(input): Json<RegisterInput>,
) -> Result<Json<RegisterOutput>, ApiError> {
    models::user::validate_email(&input.email)?;
    models::user::validate_name(&input.name)?;
    let user = auth_service(&state).register(input).await?;
    Ok(Json(RegisterOutput { user_id: user.id, email: user.email }))
}

#[utoipa::path(post, path = "/auth/login", tag = "auth",
    request_body = crate::openapi::LoginRequest,
    responses(
        (status = 200, description = "Bearer token issued"),
        (status = 401, description = "Unknown email or wrong password")))]
pub async fn login(
    State(state): State<ServerState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<LoginOutput>, ApiError> {
    let session = auth_service(&state).login(input).await?;
    Ok(Json(LoginOutput { access_token: session.token, token_type: "bearer" }))
}

#[utoipa::path(post, path = "/auth/forgot-password", tag = "auth",
    request_body = crate::openapi::ForgotPasswordRequest,
    responses(
        (status = 200, description = "Recovery token issued"),
        (status = 404, description = "Unknown email")))]
pub async fn forgot_password(
    State(state): State<ServerState>,
    Json(input): Json<ForgotPasswordInput>,
) -> Result<Json<ForgotPasswordOutput>, ApiError> {
    let token = auth_service(&state).forgot_password(&input.email).await?;
    Ok(Json(ForgotPasswordOutput { reset_token: token }))
}

#[utoipa::path(post, path = "/auth/reset-password", tag = "auth",
    request_body = crate::openapi::ResetPasswordRequest,
    responses(
        (status = 200, description = "Password replaced"),
        (status = 401, description = "Bad or expired recovery token")))]
pub async fn reset_password(
    State(state): State<ServerState>,
    Json(input): Json<ResetPasswordInput>,
) -> Result<Json<serde_json::Value>, ApiError> {
    auth_service(&state)
        .reset_password(&input.token, &input.new_password)
        .await?;
    Ok(Json(serde_json::json!({ "detail": "password updated" })))
}
