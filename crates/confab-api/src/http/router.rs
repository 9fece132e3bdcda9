//! Axum router configuration with middleware.
//!
//! All routes are under `/api/`, except the unauthenticated health check.
//! Middleware: CORS (permissive, suitable for a browser frontend on another
//! origin), request tracing.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Accounts
        .route("/users/register", post(handlers::user::register))
        .route("/users/login", post(handlers::user::login))
        // Chat CRUD
        .route(
            "/chats",
            get(handlers::chat::list_chats).post(handlers::chat::create_chat),
        )
        .route(
            "/chats/{id}",
            get(handlers::chat::get_chat)
                .put(handlers::chat::rename_chat)
                .delete(handlers::chat::delete_chat),
        )
        // Send a message through the AI adapter
        .route("/chat", post(handlers::message::send_message));

    Router::new()
        .nest("/api", api_routes)
        .route("/healthz", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /healthz - Simple health check endpoint (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "ok": true,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
