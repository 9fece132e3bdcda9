//! Chat service: ownership-scoped CRUD over chats and their messages.
//!
//! Every operation takes the authenticated owner's id and passes it down to
//! the repository, which folds it into each WHERE clause. A chat belonging
//! to another user is indistinguishable from a missing one.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use confab_types::chat::{Chat, ChatWithMessages, DEFAULT_CHAT_TITLE};
use confab_types::error::{ChatError, RepositoryError};

use crate::repository::chat::ChatRepository;

/// Orchestrates chat CRUD on behalf of an authenticated user.
pub struct ChatService<C: ChatRepository> {
    chats: C,
}

impl<C: ChatRepository> ChatService<C> {
    /// Create a new chat service with the given repository.
    pub fn new(chats: C) -> Self {
        Self { chats }
    }

    /// List a user's chats, most recently active first.
    pub async fn list_chats(
        &self,
        owner_id: &Uuid,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Chat>, ChatError> {
        Ok(self.chats.list_chats(owner_id, limit, offset).await?)
    }

    /// Create a chat. A missing or blank title becomes the default.
    pub async fn create_chat(
        &self,
        owner_id: &Uuid,
        title: Option<String>,
    ) -> Result<Chat, ChatError> {
        let now = Utc::now();
        let chat = Chat {
            id: Uuid::now_v7(),
            user_id: *owner_id,
            title: normalize_title(title),
            created_at: now,
            updated_at: now,
        };

        let created = self.chats.create_chat(&chat).await?;
        info!(chat_id = %created.id, "chat created");
        Ok(created)
    }

    /// Fetch a chat with its full message history, oldest first.
    pub async fn get_chat_with_messages(
        &self,
        owner_id: &Uuid,
        chat_id: &Uuid,
    ) -> Result<ChatWithMessages, ChatError> {
        let chat = self
            .chats
            .get_chat(chat_id, owner_id)
            .await?
            .ok_or(ChatError::NotFound)?;

        let messages = self.chats.get_messages(chat_id, owner_id).await?;

        Ok(ChatWithMessages { chat, messages })
    }

    /// Rename a chat. A missing or blank title resets it to the default.
    pub async fn rename_chat(
        &self,
        owner_id: &Uuid,
        chat_id: &Uuid,
        title: Option<String>,
    ) -> Result<Chat, ChatError> {
        let title = normalize_title(title);

        match self.chats.rename_chat(chat_id, owner_id, &title).await {
            Ok(()) => {}
            Err(RepositoryError::NotFound) => return Err(ChatError::NotFound),
            Err(e) => return Err(e.into()),
        }

        self.chats
            .get_chat(chat_id, owner_id)
            .await?
            .ok_or(ChatError::NotFound)
    }

    /// Delete a chat and, by cascade, all of its messages.
    pub async fn delete_chat(&self, owner_id: &Uuid, chat_id: &Uuid) -> Result<(), ChatError> {
        match self.chats.delete_chat(chat_id, owner_id).await {
            Ok(()) => {
                info!(chat_id = %chat_id, "chat deleted");
                Ok(())
            }
            Err(RepositoryError::NotFound) => Err(ChatError::NotFound),
            Err(e) => Err(e.into()),
        }
    }
}

/// Trim the client-supplied title; blank or absent falls back to the default.
fn normalize_title(title: Option<String>) -> String {
    match title {
        Some(t) => {
            let t = t.trim();
            if t.is_empty() {
                DEFAULT_CHAT_TITLE.to_string()
            } else {
                t.to_string()
            }
        }
        None => DEFAULT_CHAT_TITLE.to_string(),
    }
}
