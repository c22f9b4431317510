use std::sync::Arc;

use sea_orm::DatabaseConnection;

use service::auth::TokenService;
use service::lifecycle::LifecyclePolicy;

/// Shared application state: the store pool, the token service and the
/// lifecycle policy, all built once at startup.
#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub tokens: Arc<TokenService>,
    pub policy: LifecyclePolicy,
}
