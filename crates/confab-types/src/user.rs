//! User account and authentication types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user account.
///
/// `user_id` is the unique login name chosen at registration; `id` is the
/// internal primary key referenced by chats and messages. The password hash
/// is an Argon2id PHC string with a per-record random salt.
///
/// Deliberately not `Serialize`: the hash must never reach a response body.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub user_id: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Claims carried by a signed access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// The user's primary key.
    pub sub: Uuid,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

/// Body of `POST /api/users/register`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub user_id: String,
    pub password: String,
}

/// Body of `POST /api/users/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub user_id: String,
    pub password: String,
}

/// Successful login response: the login name and a bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub user_id: String,
    pub token: String,
}
