//! Shared domain types for Confab.
//!
//! This crate contains the core domain types used across the Confab backend:
//! User, Chat, ChatMessage, prompt/completion shapes, and their associated
//! error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod error;
pub mod llm;
pub mod user;
