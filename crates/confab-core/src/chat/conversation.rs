//! Conversation adapter: history windowing, the provider call, and paired
//! persistence.
//!
//! On each send the adapter loads the chat's history, keeps the most recent
//! [`HISTORY_WINDOW`] turns, maps stored roles onto prompt roles (`bot` ->
//! `assistant`), prepends the fixed system instruction, appends the new user
//! turn, and sends the lot as one completion request. A successful call
//! persists exactly one user message followed by one bot message, paired by
//! reference, and bumps the chat's `updated_at`. Nothing is written on any
//! failure path.

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use confab_types::chat::{ChatMessage, MessageRole};
use confab_types::error::ConversationError;
use confab_types::llm::{CompletionRequest, PromptMessage, PromptRole};

use crate::llm::provider::CompletionProvider;
use crate::repository::chat::ChatRepository;

/// How many stored turns are kept when building the prompt.
pub const HISTORY_WINDOW: usize = 12;

/// Upper bound on an incoming message, in characters.
pub const MAX_MESSAGE_LEN: usize = 5_000;

/// Fixed instruction prepended to every prompt.
const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Sampling temperature sent with every request.
const REPLY_TEMPERATURE: f64 = 0.7;

/// Completion length cap sent with every request.
const REPLY_MAX_TOKENS: u32 = 512;

/// Drives one user turn through the provider and into the store.
pub struct ConversationService<C: ChatRepository, P: CompletionProvider> {
    chats: C,
    provider: P,
}

impl<C: ChatRepository, P: CompletionProvider> ConversationService<C, P> {
    /// Create a new conversation service with the given backends.
    pub fn new(chats: C, provider: P) -> Self {
        Self { chats, provider }
    }

    /// Send a user message to a chat and return the persisted bot reply.
    pub async fn send_message(
        &self,
        owner_id: &Uuid,
        chat_id: &Uuid,
        text: &str,
    ) -> Result<ChatMessage, ConversationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ConversationError::EmptyMessage);
        }
        if text.chars().count() > MAX_MESSAGE_LEN {
            return Err(ConversationError::MessageTooLong {
                max: MAX_MESSAGE_LEN,
            });
        }

        let chat = self
            .chats
            .get_chat(chat_id, owner_id)
            .await?
            .ok_or(ConversationError::ChatNotFound)?;

        let history = self.chats.get_messages(chat_id, owner_id).await?;

        let request = CompletionRequest {
            // Empty model: the provider substitutes its configured default.
            model: String::new(),
            messages: build_prompt(&history, text),
            temperature: Some(REPLY_TEMPERATURE),
            max_tokens: Some(REPLY_MAX_TOKENS),
        };

        info!(
            chat_id = %chat.id,
            history = history.len().min(HISTORY_WINDOW),
            "sending completion request"
        );

        let reply = match self.provider.complete(&request).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(chat_id = %chat.id, error = %e, "completion request failed");
                return Err(e.into());
            }
        };

        let user_message = ChatMessage {
            id: Uuid::now_v7(),
            chat_id: chat.id,
            user_id: *owner_id,
            role: MessageRole::User,
            text: text.to_string(),
            pair_id: None,
            created_at: Utc::now(),
        };

        let bot_message = ChatMessage {
            id: Uuid::now_v7(),
            chat_id: chat.id,
            user_id: *owner_id,
            role: MessageRole::Bot,
            text: reply,
            pair_id: Some(user_message.id),
            created_at: Utc::now(),
        };

        self.chats.save_exchange(&user_message, &bot_message).await?;

        info!(chat_id = %chat.id, message_id = %bot_message.id, "exchange persisted");
        Ok(bot_message)
    }
}

/// Assemble the role-tagged prompt: system instruction, the most recent
/// [`HISTORY_WINDOW`] stored turns, then the new user turn.
fn build_prompt(history: &[ChatMessage], text: &str) -> Vec<PromptMessage> {
    let tail_start = history.len().saturating_sub(HISTORY_WINDOW);
    let tail = &history[tail_start..];

    let mut messages = Vec::with_capacity(tail.len() + 2);
    messages.push(PromptMessage::new(PromptRole::System, SYSTEM_PROMPT));

    for m in tail {
        let role = match m.role {
            MessageRole::User => PromptRole::User,
            MessageRole::Bot => PromptRole::Assistant,
        };
        messages.push(PromptMessage::new(role, m.text.clone()));
    }

    messages.push(PromptMessage::new(PromptRole::User, text));
    messages
}
