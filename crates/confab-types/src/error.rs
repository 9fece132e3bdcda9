use thiserror::Error;

use crate::llm::LlmError;

/// Errors related to account registration and login.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("User already exists")]
    AlreadyExists,

    /// Bad login name or bad password. Deliberately a single variant with a
    /// single message so the two cases cannot be told apart by a caller.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("invalid user id: {0}")]
    InvalidUserId(String),

    #[error("invalid password: {0}")]
    InvalidPassword(String),

    #[error("credential error: {0}")]
    Credential(String),

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// Errors from signing or verifying access tokens.
///
/// The API layer collapses all of these (and a missing token user) into one
/// uniform 401 so a probing client learns nothing about why a token failed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("token expired")]
    Expired,

    #[error("token signing failed")]
    Signing,
}

/// Errors from authenticating a request token.
///
/// Uniform by construction: malformed, expired, and forged tokens, and tokens
/// whose user no longer exists, all collapse into `Unauthorized`.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Not authorized")]
    Unauthorized,

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// Errors related to chat CRUD.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Also covers chats owned by someone else: an ownership-scoped lookup
    /// cannot tell the difference, and neither should the caller.
    #[error("Chat not found")]
    NotFound,

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// Errors from sending a message through the AI adapter.
#[derive(Debug, Error)]
pub enum ConversationError {
    #[error("Message is required")]
    EmptyMessage,

    #[error("Message too long (max {max} chars)")]
    MessageTooLong { max: usize },

    #[error("Chat not found")]
    ChatNotFound,

    #[error(transparent)]
    Provider(#[from] LlmError),

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// Errors from repository operations (used by trait definitions in confab-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_error_messages_match_api_contract() {
        assert_eq!(UserError::AlreadyExists.to_string(), "User already exists");
        assert_eq!(
            UserError::InvalidCredentials.to_string(),
            "Invalid credentials"
        );
    }

    #[test]
    fn test_conversation_error_display() {
        let err = ConversationError::MessageTooLong { max: 5000 };
        assert_eq!(err.to_string(), "Message too long (max 5000 chars)");
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }
}
