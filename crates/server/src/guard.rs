use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use service::auth::token::TokenError;

use crate::errors::ApiError;
use crate::state::ServerState;

/// Pull the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Middleware guarding every protected route. Verifies the bearer token
/// and stashes the caller's [`Identity`](service::auth::domain::Identity)
/// in the request extensions for handlers to pick up.
pub async fn authenticate(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("missing authorization header"))?;

    let token = bearer_token(header).ok_or_else(|| {
        warn!("malformed authorization header");
        ApiError::unauthorized("invalid authorization header")
    })?;

    let claims = state.tokens.verify(token).map_err(|e| match e {
        TokenError::Expired => ApiError::unauthorized("token has expired"),
        _ => ApiError::unauthorized("invalid or expired token"),
    })?;

    let identity = claims
        .identity()
        .map_err(|_| ApiError::unauthorized("invalid or expired token"))?;

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}
