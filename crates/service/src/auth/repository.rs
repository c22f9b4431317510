use async_trait::async_trait;

use models::Role;

use super::domain::AuthUser;
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn create_user(
        &self,
        email: &str,
        name: &str,
        password_hash: String,
        role: Role,
    ) -> Result<AuthUser, AuthError>;

    async fn get_password_hash(&self, user_id: i64) -> Result<Option<String>, AuthError>;
    async fn update_password_hash(&self, user_id: i64, password_hash: String) -> Result<(), AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAuthRepository {
        users: Mutex<HashMap<String, AuthUser>>, // key: email
        hashes: Mutex<HashMap<i64, String>>,     // key: user id
        next_id: AtomicI64,
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().unwrap();
            Ok(users.get(email).cloned())
        }

        async fn create_user(
            &self,
            email: &str,
            name: &str,
            password_hash: String,
            role: Role,
        ) -> Result<AuthUser, AuthError> {
            let mut users = self.users.lock().unwrap();
            if users.contains_key(email) {
                return Err(AuthError::Conflict);
            }
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            let user = AuthUser { id, email: email.to_string(), name: name.to_string(), role };
            users.insert(email.to_string(), user.clone());
            self.hashes.lock().unwrap().insert(id, password_hash);
            Ok(user)
        }

        async fn get_password_hash(&self, user_id: i64) -> Result<Option<String>, AuthError> {
            let hashes = self.hashes.lock().unwrap();
            Ok(hashes.get(&user_id).cloned())
        }

        async fn update_password_hash(&self, user_id: i64, password_hash: String) -> Result<(), AuthError> {
            let mut hashes = self.hashes.lock().unwrap();
            hashes.insert(user_id, password_hash);
            Ok(())
        }
    }
}
