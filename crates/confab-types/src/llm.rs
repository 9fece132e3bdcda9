//! Completion request types and provider errors.
//!
//! These model the outbound side of the AI adapter: role-tagged prompt turns,
//! the single completion request sent to the provider, and the distinct ways
//! a provider call can fail.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a turn in a completion prompt.
///
/// Distinct from [`crate::chat::MessageRole`]: stored messages use `user`/`bot`,
/// while the provider wire format speaks `system`/`user`/`assistant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for PromptRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptRole::System => write!(f, "system"),
            PromptRole::User => write!(f, "user"),
            PromptRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single role-tagged turn in a completion prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub content: String,
}

impl PromptMessage {
    pub fn new(role: PromptRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Request to the completion provider.
///
/// An empty `model` means "use the provider's configured default".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<PromptMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Errors from completion provider operations.
///
/// The variants matter for logging and tests; the API layer collapses all of
/// them into a single 502 with a generic client message.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The provider answered with an error payload instead of choices.
    #[error("provider error: {message}")]
    Provider { message: String },

    /// The HTTP exchange itself failed (connect, TLS, body read).
    #[error("transport error: {0}")]
    Transport(String),

    /// The request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The provider rejected our credentials (HTTP 401/403).
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The provider rate-limited the request (HTTP 429).
    #[error("rate limited")]
    RateLimited,

    /// The response body did not parse as any known shape.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// The call succeeded but no non-empty reply could be extracted.
    #[error("empty reply from provider")]
    EmptyReply,
}
