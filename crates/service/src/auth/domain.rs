use models::Role;
use serde::{Deserialize, Serialize};

use super::errors::AuthError;

/// Registration input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub name: String,
    pub password: String,
    pub role: Role,
}

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Domain user (business view)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// Login result (session)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: AuthUser,
    pub token: String,
}

/// Caller identity as carried in a verified access token.
///
/// The role is the claim captured at issuance time and is NOT re-read
/// from the store per request: a role change only takes effect once the
/// user logs in again. This avoids a store round trip on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

impl Identity {
    /// Equality check against the embedded role claim.
    pub fn require_role(&self, expected: Role) -> Result<(), AuthError> {
        if self.role != expected {
            return Err(AuthError::Forbidden(format!("requires {} role", expected)));
        }
        Ok(())
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
