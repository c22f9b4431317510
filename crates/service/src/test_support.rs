//! Shared helpers for DB-backed tests; tests skip when no database is
//! reachable so the suite stays green on plain dev machines.

use migration::MigratorTrait;
use sea_orm::DatabaseConnection;

pub async fn get_db() -> anyhow::Result<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        anyhow::bail!("SKIP_DB_TESTS set");
    }
    let db = models::db::connect_from_env().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}
