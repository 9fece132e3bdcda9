//! Authentication ports and the auth service.
//!
//! The hashing and token primitives are behind traits so the service can be
//! tested without touching argon2 or HMAC; the real implementations live in
//! `confab-infra::crypto`.

pub mod service;

use confab_types::error::TokenError;
use confab_types::user::TokenClaims;
use uuid::Uuid;

/// Failure inside a hashing backend.
///
/// Carries no detail on purpose: nothing derived from a password belongs in
/// an error message.
#[derive(Debug, thiserror::Error)]
#[error("credential processing failed")]
pub struct CredentialError;

/// Password hashing with a per-record salt.
pub trait PasswordHasher: Send + Sync {
    /// Hash a password into a self-describing string (salt included).
    fn hash(&self, password: &str) -> Result<String, CredentialError>;

    /// Verify a password against a stored hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, CredentialError>;
}

/// Signed, time-limited access tokens.
pub trait TokenIssuer: Send + Sync {
    /// Issue a token for the given user primary key.
    fn issue(&self, user_id: &Uuid) -> Result<String, TokenError>;

    /// Verify a token's signature and expiry, returning its claims.
    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError>;
}
