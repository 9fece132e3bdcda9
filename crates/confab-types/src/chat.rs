//! Chat and message types.
//!
//! A `Chat` is a titled conversation owned by exactly one user. Messages are
//! append-only turns within a chat; a bot reply carries a `pair_id` pointing
//! at the user message that produced it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Title assigned when a chat is created or renamed without one.
pub const DEFAULT_CHAT_TITLE: &str = "Untitled Chat";

/// Who authored a stored message.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (role IN ('user', 'bot'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Bot,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Bot => write!(f, "bot"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "bot" => Ok(MessageRole::Bot),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A titled conversation owned by a single user.
///
/// `updated_at` is bumped whenever a new exchange is persisted, so listing
/// by recency reflects actual conversation activity rather than creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single turn within a chat.
///
/// Append-only: never mutated after creation, removed only by cascade when
/// the owning chat is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub user_id: Uuid,
    pub role: MessageRole,
    pub text: String,
    /// For bot replies, the id of the user message that produced this reply.
    pub pair_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/chats` and `PUT /api/chats/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatTitleRequest {
    pub title: Option<String>,
}

/// Response shape of `GET /api/chats/{id}`: the chat plus its full history,
/// oldest first.
#[derive(Debug, Clone, Serialize)]
pub struct ChatWithMessages {
    #[serde(flatten)]
    pub chat: Chat,
    pub messages: Vec<ChatMessage>,
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    pub chat_id: String,
    pub message: String,
}

/// Response of `POST /api/chat`: the extracted bot reply.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageResponse {
    pub reply: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_roundtrip() {
        for role in [MessageRole::User, MessageRole::Bot] {
            let s = role.to_string();
            let parsed: MessageRole = s.parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_message_role_parse_invalid() {
        let err = "assistant".parse::<MessageRole>().unwrap_err();
        assert!(err.contains("assistant"));
    }

    #[test]
    fn test_message_role_serde_lowercase() {
        let json = serde_json::to_string(&MessageRole::Bot).unwrap();
        assert_eq!(json, "\"bot\"");
    }
}
