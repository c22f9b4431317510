use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::domain::{AuthSession, AuthUser, Identity, LoginInput, RegisterInput};
use super::errors::AuthError;
use super::password;
use super::repository::AuthRepository;
use super::token::TokenService;

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    tokens: Arc<TokenService>,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, tokens: Arc<TokenService>) -> Self {
        Self { repo, tokens }
    }

    /// Register a new user with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::auth::{AuthService, TokenService, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use models::Role;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let tokens = Arc::new(TokenService::new("doc-secret", "HS256", 30).unwrap());
    /// let svc = AuthService::new(repo, tokens);
    /// let input = RegisterInput { email: "user@example.com".into(), name: "Test".into(), password: "Secret123".into(), role: Role::Client };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.email, "user@example.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        password::validate_length(&input.password)?;
        if let Some(existing) = self.repo.find_user_by_email(&input.email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let hash = password::hash(&input.password)?;
        let user = self
            .repo
            .create_user(&input.email, &input.name, hash, input.role)
            .await?;
        info!(user_id = user.id, email = %user.email, role = %user.role, "user_registered");
        Ok(user)
    }

    /// Authenticate a user and issue an access token.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = match self.repo.find_user_by_email(&input.email).await? {
            Some(u) => u,
            None => {
                warn!(email = %input.email, "failed login attempt: unknown user");
                return Err(AuthError::Unauthorized);
            }
        };

        let stored = self
            .repo
            .get_password_hash(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        if !password::verify(&input.password, &stored)? {
            warn!(email = %input.email, "failed login attempt: bad password");
            return Err(AuthError::Unauthorized);
        }

        let identity = Identity { id: user.id, email: user.email.clone(), role: user.role };
        let token = self.tokens.issue(&identity, None)?;
        info!(user_id = user.id, email = %user.email, "user_logged_in");
        Ok(AuthSession { user, token })
    }

    /// Issue a short-lived recovery token bound to the user's email.
    ///
    /// TODO: hand the token to an outbound mailer once one exists; for
    /// now callers log it so operators can relay it manually.
    #[instrument(skip(self))]
    pub async fn forgot_password(&self, email: &str) -> Result<String, AuthError> {
        self.repo
            .find_user_by_email(email)
            .await?
            .ok_or(AuthError::NotFound)?;
        let token = self.tokens.issue_reset(email)?;
        info!(email = %email, "recovery_token_issued");
        Ok(token)
    }

    /// Consume a recovery token and set a new password.
    #[instrument(skip(self, token, new_password))]
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        let email = self.tokens.verify_reset(token)?;
        let user = self
            .repo
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthError::NotFound)?;
        password::validate_length(new_password)?;
        let hash = password::hash(new_password)?;
        self.repo.update_password_hash(user.id, hash).await?;
        info!(user_id = user.id, email = %email, "password_reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAuthRepository;
    use crate::auth::token::TokenError;
    use models::Role;

    fn svc() -> AuthService<MockAuthRepository> {
        let repo = Arc::new(MockAuthRepository::default());
        let tokens = Arc::new(TokenService::new("test-secret", "HS256", 30).unwrap());
        AuthService::new(repo, tokens)
    }

    fn register_input(email: &str, role: Role) -> RegisterInput {
        RegisterInput {
            email: email.into(),
            name: "Tester".into(),
            password: "Passw0rd!".into(),
            role,
        }
    }

    #[tokio::test]
    async fn register_then_login_issues_valid_token() {
        let svc = svc();
        let user = svc.register(register_input("u@e.com", Role::Client)).await.unwrap();
        assert_eq!(user.role, Role::Client);

        let session = svc
            .login(LoginInput { email: "u@e.com".into(), password: "Passw0rd!".into() })
            .await
            .unwrap();
        assert_eq!(session.user.email, "u@e.com");

        let tokens = TokenService::new("test-secret", "HS256", 30).unwrap();
        let claims = tokens.verify(&session.token).unwrap();
        assert_eq!(claims.sub, "u@e.com");
        assert_eq!(claims.role, "client");
        assert_eq!(claims.id, user.id);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let svc = svc();
        svc.register(register_input("dup@e.com", Role::Client)).await.unwrap();
        let err = svc.register(register_input("dup@e.com", Role::Driver)).await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict));
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let svc = svc();
        svc.register(register_input("w@e.com", Role::Client)).await.unwrap();
        let err = svc
            .login(LoginInput { email: "w@e.com".into(), password: "nope-nope".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn unknown_user_is_unauthorized() {
        let err = svc()
            .login(LoginInput { email: "ghost@e.com".into(), password: "whatever1".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn over_long_password_rejected_not_truncated() {
        let svc = svc();
        let mut input = register_input("long@e.com", Role::Client);
        input.password = "x".repeat(73);
        let err = svc.register(input).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn reset_flow_replaces_password() {
        let svc = svc();
        svc.register(register_input("r@e.com", Role::Client)).await.unwrap();

        let token = svc.forgot_password("r@e.com").await.unwrap();
        svc.reset_password(&token, "NewSecret9").await.unwrap();

        // Old password no longer works, new one does
        let err = svc
            .login(LoginInput { email: "r@e.com".into(), password: "Passw0rd!".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
        svc.login(LoginInput { email: "r@e.com".into(), password: "NewSecret9".into() })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn forgot_password_for_unknown_user_is_not_found() {
        let err = svc().forgot_password("ghost@e.com").await.unwrap_err();
        assert!(matches!(err, AuthError::NotFound));
    }

    #[tokio::test]
    async fn reset_with_garbage_token_is_invalid() {
        let err = svc().reset_password("garbage", "NewSecret9").await.unwrap_err();
        assert!(matches!(err, AuthError::Token(TokenError::Invalid)));
    }
}
