//! Chat CRUD and the conversation adapter.

pub mod conversation;
pub mod service;

pub use conversation::ConversationService;
pub use service::ChatService;
