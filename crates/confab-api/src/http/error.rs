//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use confab_types::error::{AuthError, ChatError, ConversationError, UserError};

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Registration/login errors.
    User(UserError),
    /// Request authentication errors.
    Auth(AuthError),
    /// Chat CRUD errors.
    Chat(ChatError),
    /// Message-send (AI adapter) errors.
    Conversation(ConversationError),
    /// Validation error.
    Validation(String),
}

impl From<UserError> for AppError {
    fn from(e: UserError) -> Self {
        AppError::User(e)
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Auth(e)
    }
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<ConversationError> for AppError {
    fn from(e: ConversationError) -> Self {
        AppError::Conversation(e)
    }
}

impl AppError {
    /// Resolve to `(status, code, client message)`.
    ///
    /// Provider failures deliberately collapse to one generic message: the
    /// distinct kinds are already separated in logs at the point of failure.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::User(UserError::AlreadyExists) => (
                StatusCode::CONFLICT,
                "USER_EXISTS",
                "User already exists".to_string(),
            ),
            AppError::User(UserError::InvalidCredentials) => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid credentials".to_string(),
            ),
            AppError::User(e @ UserError::InvalidUserId(_))
            | AppError::User(e @ UserError::InvalidPassword(_)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string())
            }
            AppError::User(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                e.to_string(),
            ),
            AppError::Auth(AuthError::Unauthorized) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Not authorized".to_string(),
            ),
            AppError::Auth(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                e.to_string(),
            ),
            AppError::Chat(ChatError::NotFound) => (
                StatusCode::NOT_FOUND,
                "CHAT_NOT_FOUND",
                "Chat not found".to_string(),
            ),
            AppError::Chat(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                e.to_string(),
            ),
            AppError::Conversation(e @ ConversationError::EmptyMessage)
            | AppError::Conversation(e @ ConversationError::MessageTooLong { .. }) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string())
            }
            AppError::Conversation(ConversationError::ChatNotFound) => (
                StatusCode::NOT_FOUND,
                "CHAT_NOT_FOUND",
                "Chat not found".to_string(),
            ),
            AppError::Conversation(ConversationError::Provider(_)) => (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                "AI provider error".to_string(),
            ),
            AppError::Conversation(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                e.to_string(),
            ),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let envelope = ApiResponse::error(code, &message, String::new(), 0);
        let body = serde_json::to_string(&envelope).unwrap_or_else(|_| {
            r#"{"errors":[{"code":"SERIALIZATION_ERROR","message":"Failed to serialize response"}]}"#.to_string()
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}
