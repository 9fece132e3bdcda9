//! Auth service: registration, login, and token authentication.
//!
//! Login failure is deliberately uniform: an unknown login name and a wrong
//! password produce the same `UserError::InvalidCredentials`, so the API
//! cannot be used to enumerate accounts.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use confab_types::error::{AuthError, RepositoryError, UserError};
use confab_types::user::User;

use crate::auth::{PasswordHasher, TokenIssuer};
use crate::repository::user::UserRepository;

/// Upper bound on login name length (after trimming).
pub const MAX_USER_ID_LEN: usize = 64;

/// Upper bound on password length.
pub const MAX_PASSWORD_LEN: usize = 1024;

/// Orchestrates registration, login, and request authentication.
///
/// Generic over `UserRepository`, `PasswordHasher`, and `TokenIssuer` to
/// maintain clean architecture (confab-core never depends on confab-infra).
pub struct AuthService<R: UserRepository, H: PasswordHasher, T: TokenIssuer> {
    users: R,
    hasher: H,
    tokens: T,
}

impl<R: UserRepository, H: PasswordHasher, T: TokenIssuer> AuthService<R, H, T> {
    /// Create a new auth service with the given backends.
    pub fn new(users: R, hasher: H, tokens: T) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Register a new account.
    ///
    /// Fails with `UserError::AlreadyExists` if the login name is taken. The
    /// up-front lookup gives the common case a clean error; the UNIQUE
    /// constraint backstops concurrent registrations of the same name.
    pub async fn register(&self, user_id: &str, password: &str) -> Result<User, UserError> {
        let user_id = validate_user_id(user_id)?;
        validate_password(password)?;

        if self.users.find_by_user_id(user_id).await?.is_some() {
            return Err(UserError::AlreadyExists);
        }

        let password_hash = self
            .hasher
            .hash(password)
            .map_err(|e| UserError::Credential(e.to_string()))?;

        let user = User {
            id: Uuid::now_v7(),
            user_id: user_id.to_string(),
            password_hash,
            created_at: Utc::now(),
        };

        let created = match self.users.create_user(&user).await {
            Ok(created) => created,
            Err(RepositoryError::Conflict(_)) => return Err(UserError::AlreadyExists),
            Err(e) => return Err(e.into()),
        };

        info!(user_id = %created.user_id, "user registered");
        Ok(created)
    }

    /// Verify credentials and issue a signed token.
    pub async fn login(&self, user_id: &str, password: &str) -> Result<(User, String), UserError> {
        let Some(user) = self.users.find_by_user_id(user_id.trim()).await? else {
            return Err(UserError::InvalidCredentials);
        };

        let matches = self
            .hasher
            .verify(password, &user.password_hash)
            .map_err(|e| UserError::Credential(e.to_string()))?;
        if !matches {
            return Err(UserError::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue(&user.id)
            .map_err(|e| UserError::Credential(e.to_string()))?;

        info!(user_id = %user.user_id, "user logged in");
        Ok((user, token))
    }

    /// Resolve a bearer token to its user.
    ///
    /// Any token defect -- malformed, forged, expired -- and a valid token
    /// whose user no longer exists all collapse into `AuthError::Unauthorized`.
    pub async fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        let claims = self
            .tokens
            .verify(token)
            .map_err(|_| AuthError::Unauthorized)?;

        self.users
            .find_by_id(&claims.sub)
            .await?
            .ok_or(AuthError::Unauthorized)
    }
}

fn validate_user_id(user_id: &str) -> Result<&str, UserError> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(UserError::InvalidUserId("user_id is required".to_string()));
    }
    if user_id.chars().count() > MAX_USER_ID_LEN {
        return Err(UserError::InvalidUserId(format!(
            "user_id too long (max {MAX_USER_ID_LEN} chars)"
        )));
    }
    Ok(user_id)
}

fn validate_password(password: &str) -> Result<(), UserError> {
    if password.is_empty() {
        return Err(UserError::InvalidPassword(
            "password is required".to_string(),
        ));
    }
    if password.chars().count() > MAX_PASSWORD_LEN {
        return Err(UserError::InvalidPassword(format!(
            "password too long (max {MAX_PASSWORD_LEN} chars)"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use confab_types::error::TokenError;
    use confab_types::user::TokenClaims;
    use std::sync::Mutex;

    /// In-memory user store mirroring the UNIQUE constraint on user_id.
    #[derive(Default)]
    struct MemoryUsers {
        users: Mutex<Vec<User>>,
    }

    impl UserRepository for MemoryUsers {
        async fn create_user(&self, user: &User) -> Result<User, RepositoryError> {
            let mut users = self.users.lock().unwrap();
            if users.iter().any(|u| u.user_id == user.user_id) {
                return Err(RepositoryError::Conflict(format!(
                    "user_id '{}' already exists",
                    user.user_id
                )));
            }
            users.push(user.clone());
            Ok(user.clone())
        }

        async fn find_by_user_id(&self, user_id: &str) -> Result<Option<User>, RepositoryError> {
            let users = self.users.lock().unwrap();
            Ok(users.iter().find(|u| u.user_id == user_id).cloned())
        }

        async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, RepositoryError> {
            let users = self.users.lock().unwrap();
            Ok(users.iter().find(|u| u.id == *id).cloned())
        }
    }

    /// Reversible "hash" good enough to exercise the service logic.
    struct PlainHasher;

    impl PasswordHasher for PlainHasher {
        fn hash(&self, password: &str) -> Result<String, crate::auth::CredentialError> {
            Ok(format!("hashed:{password}"))
        }

        fn verify(&self, password: &str, hash: &str) -> Result<bool, crate::auth::CredentialError> {
            Ok(hash == format!("hashed:{password}"))
        }
    }

    /// Token backend that encodes the user id directly.
    struct PlainTokens;

    impl TokenIssuer for PlainTokens {
        fn issue(&self, user_id: &Uuid) -> Result<String, TokenError> {
            Ok(format!("tok:{user_id}"))
        }

        fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
            let sub = token
                .strip_prefix("tok:")
                .and_then(|s| s.parse().ok())
                .ok_or(TokenError::Malformed)?;
            Ok(TokenClaims {
                sub,
                iat: 0,
                exp: i64::MAX,
            })
        }
    }

    fn service() -> AuthService<MemoryUsers, PlainHasher, PlainTokens> {
        AuthService::new(MemoryUsers::default(), PlainHasher, PlainTokens)
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let svc = service();
        let user = svc.register("alice", "hunter2!").await.unwrap();
        assert_eq!(user.user_id, "alice");

        let (logged_in, token) = svc.login("alice", "hunter2!").await.unwrap();
        assert_eq!(logged_in.id, user.id);
        assert!(!token.is_empty());
    }

    #[tokio::test]
    async fn test_register_duplicate_fails() {
        let svc = service();
        svc.register("alice", "hunter2!").await.unwrap();

        let err = svc.register("alice", "other-pass").await.unwrap_err();
        assert!(matches!(err, UserError::AlreadyExists));
        assert_eq!(err.to_string(), "User already exists");
    }

    #[tokio::test]
    async fn test_register_trims_user_id() {
        let svc = service();
        svc.register("  alice  ", "hunter2!").await.unwrap();
        let err = svc.register("alice", "hunter2!").await.unwrap_err();
        assert!(matches!(err, UserError::AlreadyExists));
    }

    #[tokio::test]
    async fn test_register_rejects_empty_fields() {
        let svc = service();
        assert!(matches!(
            svc.register("   ", "pw").await.unwrap_err(),
            UserError::InvalidUserId(_)
        ));
        assert!(matches!(
            svc.register("alice", "").await.unwrap_err(),
            UserError::InvalidPassword(_)
        ));
    }

    #[tokio::test]
    async fn test_register_rejects_oversized_user_id() {
        let svc = service();
        let long_id = "a".repeat(MAX_USER_ID_LEN + 1);
        assert!(matches!(
            svc.register(&long_id, "pw").await.unwrap_err(),
            UserError::InvalidUserId(_)
        ));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let svc = service();
        svc.register("alice", "hunter2!").await.unwrap();

        let unknown = svc.login("bob", "hunter2!").await.unwrap_err();
        let wrong_pass = svc.login("alice", "wrong").await.unwrap_err();

        assert_eq!(unknown.to_string(), "Invalid credentials");
        assert_eq!(wrong_pass.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn test_authenticate_resolves_token_to_user() {
        let svc = service();
        let user = svc.register("alice", "hunter2!").await.unwrap();
        let (_, token) = svc.login("alice", "hunter2!").await.unwrap();

        let resolved = svc.authenticate(&token).await.unwrap();
        assert_eq!(resolved.id, user.id);
    }

    #[tokio::test]
    async fn test_authenticate_rejects_garbage_and_unknown_subject() {
        let svc = service();
        svc.register("alice", "hunter2!").await.unwrap();

        assert!(matches!(
            svc.authenticate("not-a-token").await.unwrap_err(),
            AuthError::Unauthorized
        ));

        // Valid shape, but the subject does not exist.
        let ghost = format!("tok:{}", Uuid::now_v7());
        assert!(matches!(
            svc.authenticate(&ghost).await.unwrap_err(),
            AuthError::Unauthorized
        ));
    }
}
