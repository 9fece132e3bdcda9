//! Repository trait definitions.
//!
//! These are the "ports" implemented by `confab-infra` (SQLite). Both traits
//! use native async fn in traits (RPITIT, Rust 2024 edition).

pub mod chat;
pub mod user;

pub use chat::ChatRepository;
pub use user::UserRepository;
