use axum::middleware;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::guard;
use crate::openapi::ApiDoc;
use crate::state::ServerState;

pub mod auth;
pub mod services;
pub mod users;

#[utoipa::path(get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public auth routes, bearer-guarded
/// service and user routes, and the Swagger UI.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/forgot-password", post(auth::forgot_password))
        .route("/auth/reset-password", post(auth::reset_password));

    let protected = Router::new()
        .route("/services", get(services::list))
        .route("/services/request", post(services::request))
        .route("/services/:service_id", get(services::get_one))
        .route("/services/:service_id/accept", put(services::accept))
        .route("/services/:service_id/complete", put(services::complete))
        .route("/services/:service_id/cancel", put(services::cancel))
        .route("/services/user/:user_id", get(services::list_for_user))
        .route("/users", get(users::list))
        .route("/users/:user_id", get(users::get_one))
        .route("/users/me", put(users::update_me).delete(users::delete_me))
        .route("/users/me/password", put(users::change_password))
        .route_layer(middleware::from_fn_with_state(state.clone(), guard::authenticate));

    public
        .merge(protected)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
