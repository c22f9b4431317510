use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use service::auth::errors::AuthError;
use service::auth::token::TokenError;
use service::errors::ServiceError;
use service::lifecycle::errors::LifecycleError;

/// HTTP-facing error: one status code and a human-readable detail body.
///
/// Mapping is fixed across the whole API: Unauthorized→401,
/// Forbidden→403, NotFound→404, InvalidTransition/Validation→400,
/// Conflict→409, anything internal→500.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self { status, detail: detail.into() }
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, detail)
    }

    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, detail)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, detail = %self.detail, "internal error");
        }
        (self.status, Json(serde_json::json!({ "detail": self.detail }))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        let status = match &e {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::Conflict => StatusCode::CONFLICT,
            AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden(_) => StatusCode::FORBIDDEN,
            AuthError::Token(TokenError::Expired) | AuthError::Token(TokenError::Invalid) => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::HashError(_) | AuthError::Token(_) | AuthError::Repository(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, e.to_string())
    }
}

impl From<LifecycleError> for ApiError {
    fn from(e: LifecycleError) -> Self {
        let status = match &e {
            LifecycleError::NotFound => StatusCode::NOT_FOUND,
            LifecycleError::Forbidden(_) => StatusCode::FORBIDDEN,
            LifecycleError::InvalidTransition(_) => StatusCode::BAD_REQUEST,
            LifecycleError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, e.to_string())
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => Self::new(StatusCode::BAD_REQUEST, msg),
            ServiceError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, msg),
            ServiceError::Db(msg) => Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg),
            ServiceError::Model(m) => m.into(),
            ServiceError::Auth(a) => a.into(),
        }
    }
}

impl From<models::errors::ModelError> for ApiError {
    fn from(e: models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::Validation(msg) => Self::new(StatusCode::BAD_REQUEST, msg),
            models::errors::ModelError::Db(msg) => Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg),
        }
    }
}
