//! User profile operations layered over `models::user`.

use sea_orm::DatabaseConnection;
use tracing::info;

use models::user;

use crate::auth::password;
use crate::errors::ServiceError;

/// Get a user by id.
pub async fn get_user(db: &DatabaseConnection, id: i64) -> Result<Option<user::Model>, ServiceError> {
    let found = user::find_by_id(db, id).await?;
    Ok(found)
}

/// List every registered user (admin surface).
pub async fn list_users(db: &DatabaseConnection) -> Result<Vec<user::Model>, ServiceError> {
    let users = user::list_all(db).await?;
    Ok(users)
}

/// Update the caller's name and/or email; `None` leaves a field as-is.
pub async fn update_profile(
    db: &DatabaseConnection,
    user_id: i64,
    name: Option<&str>,
    email: Option<&str>,
) -> Result<user::Model, ServiceError> {
    user::find_by_id(db, user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("user"))?;
    let updated = user::update_profile(db, user_id, name, email).await?;
    info!(user_id, "profile_updated");
    Ok(updated)
}

/// Change the caller's password after verifying the current one.
pub async fn change_password(
    db: &DatabaseConnection,
    user_id: i64,
    old_password: &str,
    new_password: &str,
) -> Result<(), ServiceError> {
    let found = user::find_by_id(db, user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("user"))?;
    if !password::verify(old_password, &found.password_hash).map_err(ServiceError::Auth)? {
        return Err(ServiceError::Validation("current password is incorrect".into()));
    }
    password::validate_length(new_password).map_err(ServiceError::Auth)?;
    let hash = password::hash(new_password).map_err(ServiceError::Auth)?;
    user::update_password(db, user_id, hash, &found.email).await?;
    info!(user_id, "password_changed");
    Ok(())
}

/// Delete the caller's account.
pub async fn delete_account(db: &DatabaseConnection, user_id: i64) -> Result<(), ServiceError> {
    user::find_by_id(db, user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("user"))?;
    user::hard_delete(db, user_id).await?;
    info!(user_id, "account_deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use models::Role;

    #[tokio::test]
    async fn user_profile_roundtrip() -> anyhow::Result<()> {
        let db = match test_support::get_db().await {
            Ok(db) => db,
            Err(e) => {
                eprintln!("skip: cannot connect to db: {}", e);
                return Ok(());
            }
        };

        let email = format!("svc_user_{}@example.com", std::process::id());
        let hash = password::hash("Passw0rd!")?;
        let created = models::user::create(&db, &email, "Svc User", hash, Role::Client, "test").await?;

        let fetched = get_user(&db, created.id).await?.expect("user exists");
        assert_eq!(fetched.email, email);

        let renamed = update_profile(&db, created.id, Some("Renamed"), None).await?;
        assert_eq!(renamed.name, "Renamed");

        change_password(&db, created.id, "Passw0rd!", "NewSecret9").await?;
        let err = change_password(&db, created.id, "Passw0rd!", "Another123").await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        delete_account(&db, created.id).await?;
        assert!(get_user(&db, created.id).await?.is_none());
        Ok(())
    }
}
