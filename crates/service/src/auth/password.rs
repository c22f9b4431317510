//! Credential store: argon2 hashing and constant-time verification.

use argon2::password_hash::{Error as HashParseError, PasswordHasher, SaltString};
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use rand::rngs::OsRng;

use super::errors::AuthError;

/// Hard input ceiling carried over from the legacy bcrypt-based system.
/// Instead of silently truncating to 72 bytes we reject longer inputs,
/// so no password material is ever dropped.
pub const MAX_PASSWORD_BYTES: usize = 72;
pub const MIN_PASSWORD_BYTES: usize = 8;

pub fn validate_length(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_BYTES {
        return Err(AuthError::Validation("password too short (>=8)".into()));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AuthError::Validation("password too long (<=72 bytes)".into()));
    }
    Ok(())
}

/// Hash a password into a PHC string with a fresh random salt.
pub fn hash(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hashed = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::HashError(e.to_string()))?
        .to_string();
    Ok(hashed)
}

/// True iff `plain` produced `stored`. A mismatch is a normal `false`;
/// an unparsable stored hash is an internal error, not a login failure.
pub fn verify(plain: &str, stored: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(stored).map_err(|e| AuthError::HashError(e.to_string()))?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(HashParseError::Password) => Ok(false),
        Err(e) => Err(AuthError::HashError(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_roundtrip() {
        let hashed = hash("Secret123").unwrap();
        assert!(verify("Secret123", &hashed).unwrap());
        assert!(!verify("Secret124", &hashed).unwrap());
    }

    #[test]
    fn distinct_salts_produce_distinct_hashes() {
        let a = hash("Secret123").unwrap();
        let b = hash("Secret123").unwrap();
        assert_ne!(a, b);
        assert!(verify("Secret123", &a).unwrap());
        assert!(verify("Secret123", &b).unwrap());
    }

    #[test]
    fn length_bounds_enforced() {
        assert!(validate_length("short").is_err());
        assert!(validate_length(&"x".repeat(73)).is_err());
        assert!(validate_length(&"x".repeat(72)).is_ok());
        assert!(validate_length("exactly8").is_ok());
    }

    #[test]
    fn garbage_stored_hash_is_internal_error() {
        let err = verify("whatever", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, AuthError::HashError(_)));
    }
}
