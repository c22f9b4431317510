use sea_orm::DatabaseConnection;

use models::Role;

use crate::auth::domain::AuthUser;
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

fn to_auth_user(u: models::user::Model) -> AuthUser {
    AuthUser { id: u.id, email: u.email, name: u.name, role: u.role }
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        let res = models::user::find_by_email(&self.db, email)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(to_auth_user))
    }

    async fn create_user(
        &self,
        email: &str,
        name: &str,
        password_hash: String,
        role: Role,
    ) -> Result<AuthUser, AuthError> {
        let created = models::user::create(&self.db, email, name, password_hash, role, "register")
            .await
            .map_err(|e| match e {
                models::errors::ModelError::Validation(msg) => AuthError::Validation(msg),
                models::errors::ModelError::Db(msg) => AuthError::Repository(msg),
            })?;
        Ok(to_auth_user(created))
    }

    async fn get_password_hash(&self, user_id: i64) -> Result<Option<String>, AuthError> {
        let res = models::user::find_by_id(&self.db, user_id)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(|u| u.password_hash))
    }

    async fn update_password_hash(&self, user_id: i64, password_hash: String) -> Result<(), AuthError> {
        models::user::update_password(&self.db, user_id, password_hash, "reset-password")
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(())
    }
}
