//! Token service: issuance and verification of signed, time-limited
//! session tokens. Tokens are stateless and unrevocable before expiry;
//! there is no server-side blacklist (accepted design limit).

use std::str::FromStr;

use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use models::Role;

use super::domain::Identity;

/// Reset tokens are always short-lived regardless of the session ttl.
const RESET_TTL_MINUTES: i64 = 30;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token")]
    Invalid,
    #[error("unsupported algorithm: {0}")]
    Algorithm(String),
    #[error("signing error: {0}")]
    Signing(String),
}

/// Access-token claims: subject email, role text, numeric user id and
/// expiration. All fields are required; a token missing any of them
/// fails verification as `Invalid`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub role: String,
    pub id: i64,
    pub exp: usize,
}

impl AccessClaims {
    /// Resolve the claims into a caller identity; an unknown role text
    /// makes the whole token invalid.
    pub fn identity(&self) -> Result<Identity, TokenError> {
        let role = Role::from_str(&self.role).map_err(|_| TokenError::Invalid)?;
        Ok(Identity { id: self.id, email: self.sub.clone(), role })
    }
}

/// Password-reset claims: bound to the email subject only.
#[derive(Debug, Serialize, Deserialize)]
struct ResetClaims {
    sub: String,
    exp: usize,
}

pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
    ttl_minutes: i64,
}

impl TokenService {
    /// Build from the configured secret, algorithm name (e.g. "HS256")
    /// and default session ttl in minutes.
    pub fn new(secret: &str, algorithm: &str, ttl_minutes: u64) -> Result<Self, TokenError> {
        let algorithm = Algorithm::from_str(algorithm)
            .map_err(|_| TokenError::Algorithm(algorithm.to_string()))?;
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            ttl_minutes: ttl_minutes as i64,
        })
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = true;
        // No leeway: a ttl of zero must read as expired immediately
        validation.leeway = 0;
        validation
    }

    /// Sign an access token for `identity`, expiring after the default
    /// ttl unless `ttl_minutes` overrides it.
    pub fn issue(&self, identity: &Identity, ttl_minutes: Option<i64>) -> Result<String, TokenError> {
        let minutes = ttl_minutes.unwrap_or(self.ttl_minutes);
        let exp = (chrono::Utc::now() + chrono::Duration::minutes(minutes)).timestamp() as usize;
        let claims = AccessClaims {
            sub: identity.email.clone(),
            role: identity.role.to_string(),
            id: identity.id,
            exp,
        };
        encode(&JwtHeader::new(self.algorithm), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Validate signature and expiration. `Expired` is reported
    /// distinctly so callers can give differentiated feedback.
    pub fn verify(&self, token: &str) -> Result<AccessClaims, TokenError> {
        match decode::<AccessClaims>(token, &self.decoding, &self.validation()) {
            Ok(data) => Ok(data.claims),
            Err(e) => match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => Err(TokenError::Expired),
                _ => Err(TokenError::Invalid),
            },
        }
    }

    /// Sign a 30-minute recovery token bound to the email subject only.
    pub fn issue_reset(&self, email: &str) -> Result<String, TokenError> {
        let exp = (chrono::Utc::now() + chrono::Duration::minutes(RESET_TTL_MINUTES)).timestamp() as usize;
        let claims = ResetClaims { sub: email.to_string(), exp };
        encode(&JwtHeader::new(self.algorithm), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Validate a recovery token and return the email it is bound to.
    pub fn verify_reset(&self, token: &str) -> Result<String, TokenError> {
        match decode::<ResetClaims>(token, &self.decoding, &self.validation()) {
            Ok(data) => Ok(data.claims.sub),
            Err(e) => match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => Err(TokenError::Expired),
                _ => Err(TokenError::Invalid),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity { id: 7, email: "d@example.com".into(), role: Role::Driver }
    }

    fn svc() -> TokenService {
        TokenService::new("test-secret", "HS256", 30).unwrap()
    }

    #[test]
    fn issue_and_verify_roundtrip() {
        let svc = svc();
        let token = svc.issue(&identity(), None).unwrap();
        let claims = svc.verify(&token).unwrap();
        assert_eq!(claims.sub, "d@example.com");
        assert_eq!(claims.role, "driver");
        assert_eq!(claims.id, 7);
        assert_eq!(claims.identity().unwrap(), identity());
    }

    #[test]
    fn zero_ttl_is_expired() {
        let svc = svc();
        let token = svc.issue(&identity(), Some(0)).unwrap();
        // exp has second granularity; step past the issuance second
        std::thread::sleep(std::time::Duration::from_secs(2));
        assert!(matches!(svc.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn wrong_secret_is_invalid_not_expired() {
        let token = svc().issue(&identity(), None).unwrap();
        let other = TokenService::new("other-secret", "HS256", 30).unwrap();
        assert!(matches!(other.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn malformed_token_is_invalid() {
        assert!(matches!(svc().verify("not.a.jwt"), Err(TokenError::Invalid)));
    }

    #[test]
    fn reset_token_roundtrip() {
        let svc = svc();
        let token = svc.issue_reset("u@example.com").unwrap();
        assert_eq!(svc.verify_reset(&token).unwrap(), "u@example.com");
    }

    #[test]
    fn reset_token_is_not_an_access_token() {
        let svc = svc();
        let token = svc.issue_reset("u@example.com").unwrap();
        // Missing role/id claims: must not authenticate a session
        assert!(matches!(svc.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn unknown_algorithm_rejected() {
        assert!(matches!(
            TokenService::new("s", "HS2048", 30),
            Err(TokenError::Algorithm(_))
        ));
    }
}
