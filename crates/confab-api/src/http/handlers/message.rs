//! Message-send handler: the inbound side of the AI adapter.
//!
//! Endpoint:
//! - POST /api/chat - Send a user message, get the bot reply

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use uuid::Uuid;

use confab_types::chat::{SendMessageRequest, SendMessageResponse};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/chat - Send a message, call the model, persist the exchange,
/// and return the reply.
pub async fn send_message(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<SendMessageRequest>,
) -> Result<Json<ApiResponse<SendMessageResponse>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let chat_id = body
        .chat_id
        .trim()
        .parse::<Uuid>()
        .map_err(|_| AppError::Validation("Invalid chat id".to_string()))?;

    let bot_message = state
        .conversation_service
        .send_message(&user.id, &chat_id, &body.message)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;

    let chat_link = format!("/api/chats/{chat_id}");
    let resp = ApiResponse::success(
        SendMessageResponse {
            reply: bot_message.text,
        },
        request_id,
        elapsed,
    )
    .with_link("chat", &chat_link);

    Ok(Json(resp))
}
