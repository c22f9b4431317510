use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::auth::TokenService;
use service::lifecycle::LifecyclePolicy;

use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Public entry: load config, connect the store, migrate, and serve.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();

    let cfg = configs::AppConfig::load_and_validate()?;

    let db = models::db::connect(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    info!("migrations applied");

    let tokens = TokenService::new(
        &cfg.auth.secret_key,
        &cfg.auth.algorithm,
        cfg.auth.access_token_expire_minutes,
    )
    .map_err(|e| anyhow::anyhow!("token service init failed: {e}"))?;

    let state = ServerState {
        db,
        tokens: Arc::new(tokens),
        policy: LifecyclePolicy {
            enforce_cancel_ownership: cfg.lifecycle.enforce_cancel_ownership,
        },
    };

    let app: Router = routes::build_router(state, build_cors());

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting api server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
