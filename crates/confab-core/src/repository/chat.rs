//! ChatRepository trait definition.
//!
//! Every read and write on chats or messages is scoped by the owning user's
//! id: a chat id alone is never enough to reach another user's data.

use confab_types::chat::{Chat, ChatMessage};
use confab_types::error::RepositoryError;
use uuid::Uuid;

/// Repository trait for chat and message persistence.
///
/// Implementations live in confab-infra (e.g., `SqliteChatRepository`).
pub trait ChatRepository: Send + Sync {
    /// Insert a new chat.
    fn create_chat(
        &self,
        chat: &Chat,
    ) -> impl std::future::Future<Output = Result<Chat, RepositoryError>> + Send;

    /// Fetch a chat by id, scoped to its owner. Returns `None` for a missing
    /// chat and for a chat owned by someone else.
    fn get_chat(
        &self,
        chat_id: &Uuid,
        owner_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Chat>, RepositoryError>> + Send;

    /// List a user's chats ordered by `updated_at` DESC.
    fn list_chats(
        &self,
        owner_id: &Uuid,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> impl std::future::Future<Output = Result<Vec<Chat>, RepositoryError>> + Send;

    /// Rename a chat and bump its `updated_at`.
    ///
    /// Returns `RepositoryError::NotFound` if no owned chat matched.
    fn rename_chat(
        &self,
        chat_id: &Uuid,
        owner_id: &Uuid,
        title: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete a chat; its messages go with it (ON DELETE CASCADE).
    ///
    /// Returns `RepositoryError::NotFound` if no owned chat matched.
    fn delete_chat(
        &self,
        chat_id: &Uuid,
        owner_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Persist one user/bot message pair and bump the chat's `updated_at`.
    ///
    /// The three writes go through the single-connection writer pool in
    /// order, so a successful exchange is always user message, then bot
    /// message, then the timestamp bump.
    fn save_exchange(
        &self,
        user_message: &ChatMessage,
        bot_message: &ChatMessage,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get a chat's messages oldest-first, scoped to the owner.
    fn get_messages(
        &self,
        chat_id: &Uuid,
        owner_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// Total messages stored for a chat.
    fn count_messages(
        &self,
        chat_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
