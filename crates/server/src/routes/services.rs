use std::sync::Arc;

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Deserialize;

use service::auth::domain::Identity;
use service::lifecycle::domain::{Action, CreateServiceInput, ServiceRequest};
use service::lifecycle::repo::seaorm::SeaOrmLifecycleRepository;
use service::lifecycle::ServiceLifecycle;

use crate::errors::ApiError;
use crate::state::ServerState;

fn lifecycle(state: &ServerState) -> ServiceLifecycle<SeaOrmLifecycleRepository> {
    ServiceLifecycle::new(
        Arc::new(SeaOrmLifecycleRepository { db: state.db.clone() }),
        state.policy,
    )
}

#[derive(Deserialize)]
pub struct RequestServiceInput {
    pub client_id: i64,
    pub pickup_lat: f64,
    pub pickup_lng: f64,
    pub destination_lat: f64,
    pub destination_lng: f64,
}

#[utoipa::path(post, path = "/services/request", tag = "services",
    request_body = crate::openapi::RequestServiceRequest,
    responses(
        (status = 200, description = "Service created in pending state"),
        (status = 401, description = "Missing or invalid token")))]
pub async fn request(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Json(input): Json<RequestServiceInput>,
) -> Result<Json<ServiceRequest>, ApiError> {
    let created = lifecycle(&state)
        .request(
            CreateServiceInput {
                client_id: input.client_id,
                pickup_lat: input.pickup_lat,
                pickup_lng: input.pickup_lng,
                destination_lat: input.destination_lat,
                destination_lng: input.destination_lng,
            },
            &identity,
        )
        .await?;
    Ok(Json(created))
}

#[utoipa::path(get, path = "/services", tag = "services",
    responses((status = 200, description = "Every service, newest last")))]
pub async fn list(
    State(state): State<ServerState>,
    Extension(_identity): Extension<Identity>,
) -> Result<Json<Vec<ServiceRequest>>, ApiError> {
    let all = lifecycle(&state).list_all().await?;
    Ok(Json(all))
}

#[utoipa::path(get, path = "/services/{service_id}", tag = "services",
    params(("service_id" = i64, Path, description = "Service id")),
    responses(
        (status = 200, description = "Service detail"),
        (status = 404, description = "No such service")))]
pub async fn get_one(
    State(state): State<ServerState>,
    Extension(_identity): Extension<Identity>,
    Path(service_id): Path<i64>,
) -> Result<Json<ServiceRequest>, ApiError> {
    let svc = lifecycle(&state).get(service_id).await?;
    Ok(Json(svc))
}

#[utoipa::path(get, path = "/services/user/{user_id}", tag = "services",
    params(("user_id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Services the user requested or drove"),
        (status = 403, description = "Not your services")))]
pub async fn list_for_user(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<ServiceRequest>>, ApiError> {
    if identity.id != user_id && !identity.is_admin() {
        return Err(ApiError::forbidden("cannot list another user's services"));
    }
    let own = lifecycle(&state).list_for_user(user_id).await?;
    Ok(Json(own))
}

async fn transition(
    state: &ServerState,
    service_id: i64,
    action: Action,
    identity: &Identity,
) -> Result<Json<ServiceRequest>, ApiError> {
    let updated = lifecycle(state).transition(service_id, action, identity).await?;
    Ok(Json(updated))
}

#[utoipa::path(put, path = "/services/{service_id}/accept", tag = "services",
    params(("service_id" = i64, Path, description = "Service id")),
    responses(
        (status = 200, description = "Service accepted by the caller"),
        (status = 400, description = "Service no longer pending"),
        (status = 403, description = "Caller is not a driver, or owns the service"),
        (status = 404, description = "No such service")))]
pub async fn accept(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Path(service_id): Path<i64>,
) -> Result<Json<ServiceRequest>, ApiError> {
    transition(&state, service_id, Action::Accept, &identity).await
}

#[utoipa::path(put, path = "/services/{service_id}/complete", tag = "services",
    params(("service_id" = i64, Path, description = "Service id")),
    responses(
        (status = 200, description = "Service completed"),
        (status = 400, description = "Service not in accepted state"),
        (status = 403, description = "Caller is not a driver, or owns the service"),
        (status = 404, description = "No such service")))]
pub async fn complete(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Path(service_id): Path<i64>,
) -> Result<Json<ServiceRequest>, ApiError> {
    transition(&state, service_id, Action::Complete, &identity).await
}

#[utoipa::path(put, path = "/services/{service_id}/cancel", tag = "services",
    params(("service_id" = i64, Path, description = "Service id")),
    responses(
        (status = 200, description = "Service cancelled"),
        (status = 400, description = "Service already completed or cancelled"),
        (status = 403, description = "Caller is not a client"),
        (status = 404, description = "No such service")))]
pub async fn cancel(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Path(service_id): Path<i64>,
) -> Result<Json<ServiceRequest>, ApiError> {
    transition(&state, service_id, Action::Cancel, &identity).await
}
