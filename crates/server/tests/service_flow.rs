use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use migration::MigratorTrait;
use serde_json::{json, Value};
use tower::ServiceExt;

use server::routes;
use server::state::ServerState;
use service::auth::TokenService;
use service::lifecycle::LifecyclePolicy;

fn cors() -> tower_http::cors::CorsLayer {
    tower_http::cors::CorsLayer::very_permissive()
}

fn unique_email(prefix: &str) -> String {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    format!("{prefix}_{nanos}@example.com")
}

async fn build_app() -> anyhow::Result<Router> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        anyhow::bail!("SKIP_DB_TESTS set");
    }
    let db = models::db::connect_from_env().await?;
    migration::Migrator::up(&db, None).await?;
    let tokens = TokenService::new("test-secret", "HS256", 30)?;
    let state = ServerState {
        db,
        tokens: Arc::new(tokens),
        policy: LifecyclePolicy::default(),
    };
    Ok(routes::build_router(state, cors()))
}

fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(t) = token {
        builder = builder.header("authorization", format!("Bearer {t}"));
    }
    builder.body(Body::from(serde_json::to_vec(&body).unwrap())).unwrap()
}

fn put(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register a user with the given role and return `(user_id, token)`.
async fn signup(app: &Router, role: &str) -> anyhow::Result<(i64, String)> {
    let email = unique_email(role);
    let resp = app
        .clone()
        .oneshot(post_json(
            "/auth/register",
            None,
            json!({"email": email, "name": "Tester", "password": "S3curePass!", "role": role}),
        ))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let user_id = body_json(resp).await["user_id"].as_i64().unwrap();

    let resp = app
        .clone()
        .oneshot(post_json(
            "/auth/login",
            None,
            json!({"email": email, "password": "S3curePass!"}),
        ))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let token = body_json(resp).await["access_token"].as_str().unwrap().to_string();
    Ok((user_id, token))
}

async fn request_service(app: &Router, client_id: i64, token: &str) -> anyhow::Result<i64> {
    let resp = app
        .clone()
        .oneshot(post_json(
            "/services/request",
            Some(token),
            json!({
                "client_id": client_id,
                "pickup_lat": 40.4168, "pickup_lng": -3.7038,
                "destination_lat": 40.4530, "destination_lng": -3.6883
            }),
        ))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let svc = body_json(resp).await;
    assert_eq!(svc["status"], "pending");
    assert!(svc["driver_id"].is_null());
    Ok(svc["id"].as_i64().unwrap())
}

#[tokio::test]
async fn full_accept_complete_flow() -> anyhow::Result<()> {
    let app = match build_app().await {
        Ok(app) => app,
        Err(e) => {
            eprintln!("skipping, no database: {e}");
            return Ok(());
        }
    };

    let (client_id, client_token) = signup(&app, "client").await?;
    let (driver_id, driver_token) = signup(&app, "driver").await?;
    let service_id = request_service(&app, client_id, &client_token).await?;

    // Client may not accept, even their own.
    let resp = app
        .clone()
        .oneshot(put(&format!("/services/{service_id}/accept"), &client_token))
        .await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = app
        .clone()
        .oneshot(put(&format!("/services/{service_id}/accept"), &driver_token))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let accepted = body_json(resp).await;
    assert_eq!(accepted["status"], "accepted");
    assert_eq!(accepted["driver_id"].as_i64().unwrap(), driver_id);

    // Second accept hits a non-pending service.
    let (_other_id, other_token) = signup(&app, "driver").await?;
    let resp = app
        .clone()
        .oneshot(put(&format!("/services/{service_id}/accept"), &other_token))
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app
        .clone()
        .oneshot(put(&format!("/services/{service_id}/complete"), &driver_token))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["status"], "completed");

    // Completed is terminal.
    let resp = app
        .clone()
        .oneshot(put(&format!("/services/{service_id}/cancel"), &client_token))
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn cancel_pending_service() -> anyhow::Result<()> {
    let app = match build_app().await {
        Ok(app) => app,
        Err(e) => {
            eprintln!("skipping, no database: {e}");
            return Ok(());
        }
    };

    let (client_id, client_token) = signup(&app, "client").await?;
    let (_driver_id, driver_token) = signup(&app, "driver").await?;
    let service_id = request_service(&app, client_id, &client_token).await?;

    // Drivers may not cancel.
    let resp = app
        .clone()
        .oneshot(put(&format!("/services/{service_id}/cancel"), &driver_token))
        .await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = app
        .clone()
        .oneshot(put(&format!("/services/{service_id}/cancel"), &client_token))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["status"], "cancelled");

    // A cancelled service cannot be accepted.
    let resp = app
        .clone()
        .oneshot(put(&format!("/services/{service_id}/accept"), &driver_token))
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn complete_requires_accepted_state() -> anyhow::Result<()> {
    let app = match build_app().await {
        Ok(app) => app,
        Err(e) => {
            eprintln!("skipping, no database: {e}");
            return Ok(());
        }
    };

    let (client_id, client_token) = signup(&app, "client").await?;
    let (_driver_id, driver_token) = signup(&app, "driver").await?;
    let service_id = request_service(&app, client_id, &client_token).await?;

    let resp = app
        .clone()
        .oneshot(put(&format!("/services/{service_id}/complete"), &driver_token))
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn user_service_listing_is_scoped() -> anyhow::Result<()> {
    let app = match build_app().await {
        Ok(app) => app,
        Err(e) => {
            eprintln!("skipping, no database: {e}");
            return Ok(());
        }
    };

    let (client_id, client_token) = signup(&app, "client").await?;
    let (driver_id, driver_token) = signup(&app, "driver").await?;
    let service_id = request_service(&app, client_id, &client_token).await?;

    let resp = app
        .clone()
        .oneshot(put(&format!("/services/{service_id}/accept"), &driver_token))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    // Driver sees the accepted service in their own listing.
    let resp = app
        .clone()
        .oneshot(get(&format!("/services/user/{driver_id}"), &driver_token))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let listed = body_json(resp).await;
    assert!(listed
        .as_array()
        .unwrap()
        .iter()
        .any(|s| s["id"].as_i64() == Some(service_id)));

    // But may not read another user's listing.
    let resp = app
        .clone()
        .oneshot(get(&format!("/services/user/{client_id}"), &driver_token))
        .await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn admin_may_query_any_listing_and_the_user_index() -> anyhow::Result<()> {
    let app = match build_app().await {
        Ok(app) => app,
        Err(e) => {
            eprintln!("skipping, no database: {e}");
            return Ok(());
        }
    };

    let (client_id, client_token) = signup(&app, "client").await?;
    let (_admin_id, admin_token) = signup(&app, "admin").await?;
    let service_id = request_service(&app, client_id, &client_token).await?;

    // Admin can read any user's listing, same result shape as self-access.
    let resp = app
        .clone()
        .oneshot(get(&format!("/services/user/{client_id}"), &admin_token))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let listed = body_json(resp).await;
    assert!(listed
        .as_array()
        .unwrap()
        .iter()
        .any(|s| s["id"].as_i64() == Some(service_id)));

    // The user index is admin-only.
    let resp = app.clone().oneshot(get("/users", &admin_token)).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let users = body_json(resp).await;
    assert!(users.as_array().unwrap().len() >= 2);

    let resp = app.clone().oneshot(get("/users", &client_token)).await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn missing_service_is_not_found() -> anyhow::Result<()> {
    let app = match build_app().await {
        Ok(app) => app,
        Err(e) => {
            eprintln!("skipping, no database: {e}");
            return Ok(());
        }
    };

    let (_client_id, client_token) = signup(&app, "client").await?;
    let resp = app.clone().oneshot(get("/services/999999999", &client_token)).await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    Ok(())
}
