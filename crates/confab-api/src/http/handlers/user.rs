//! Registration and login handlers.
//!
//! Endpoints:
//! - POST /api/users/register - Create an account
//! - POST /api/users/login    - Verify credentials, issue a bearer token

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use uuid::Uuid;

use confab_types::user::{AuthResponse, LoginRequest, RegisterRequest};

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/users/register - Create a new account.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let user = state
        .auth_service
        .register(&body.user_id, &body.password)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(
        serde_json::json!({"user_id": user.user_id}),
        request_id,
        elapsed,
    )
    .with_link("login", "/api/users/login");

    Ok(Json(resp))
}

/// POST /api/users/login - Verify credentials and issue a token.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let (user, token) = state
        .auth_service
        .login(&body.user_id, &body.password)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(
        AuthResponse {
            user_id: user.user_id,
            token,
        },
        request_id,
        elapsed,
    )
    .with_link("chats", "/api/chats");

    Ok(Json(resp))
}
