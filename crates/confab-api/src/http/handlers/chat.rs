//! Chat CRUD HTTP handlers.
//!
//! Endpoints:
//! - GET    /api/chats      - List the caller's chats, most recent first
//! - POST   /api/chats      - Create a chat
//! - GET    /api/chats/{id} - Get a chat with its messages
//! - PUT    /api/chats/{id} - Rename a chat
//! - DELETE /api/chats/{id} - Delete a chat and its messages

use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use confab_types::chat::{Chat, ChatTitleRequest, ChatWithMessages};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Query parameters for chat listing.
#[derive(Debug, Deserialize)]
pub struct ChatListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// Parse a chat id from a path parameter, returning a 400 error on invalid format.
fn parse_chat_id(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| AppError::Validation("Invalid chat id".to_string()))
}

/// GET /api/chats - List the caller's chats.
pub async fn list_chats(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ChatListQuery>,
) -> Result<Json<ApiResponse<Vec<Chat>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let chats = state
        .chat_service
        .list_chats(&user.id, Some(query.limit), Some(query.offset))
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(chats, request_id, elapsed).with_link("self", "/api/chats");

    Ok(Json(resp))
}

/// POST /api/chats - Create a chat.
pub async fn create_chat(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<ChatTitleRequest>,
) -> Result<Json<ApiResponse<Chat>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let chat = state.chat_service.create_chat(&user.id, body.title).await?;

    let elapsed = start.elapsed().as_millis() as u64;

    let self_link = format!("/api/chats/{}", chat.id);
    let resp = ApiResponse::success(chat, request_id, elapsed).with_link("self", &self_link);

    Ok(Json(resp))
}

/// GET /api/chats/{id} - Get a chat with its messages, oldest first.
pub async fn get_chat(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ChatWithMessages>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let chat_id = parse_chat_id(&id)?;
    let chat = state
        .chat_service
        .get_chat_with_messages(&user.id, &chat_id)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;

    let self_link = format!("/api/chats/{chat_id}");
    let resp = ApiResponse::success(chat, request_id, elapsed).with_link("self", &self_link);

    Ok(Json(resp))
}

/// PUT /api/chats/{id} - Rename a chat.
pub async fn rename_chat(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<ChatTitleRequest>,
) -> Result<Json<ApiResponse<Chat>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let chat_id = parse_chat_id(&id)?;
    let chat = state
        .chat_service
        .rename_chat(&user.id, &chat_id, body.title)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;

    let self_link = format!("/api/chats/{chat_id}");
    let resp = ApiResponse::success(chat, request_id, elapsed).with_link("self", &self_link);

    Ok(Json(resp))
}

/// DELETE /api/chats/{id} - Delete a chat and, by cascade, its messages.
pub async fn delete_chat(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let chat_id = parse_chat_id(&id)?;
    state.chat_service.delete_chat(&user.id, &chat_id).await?;

    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(
        serde_json::json!({"deleted": true}),
        request_id,
        elapsed,
    );

    Ok(Json(resp))
}
