pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::chat;
use crate::logs;
use crate::state::AppState;
use crate::summary::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Summary generation (patient entry page, CLI parity)
        .route("/api/v1/summaries", post(handlers::handle_generate))
        // Template registry (UI picker + editor)
        .route("/api/v1/templates", get(handlers::handle_list_templates))
        .route("/api/v1/templates/:id", get(handlers::handle_get_template))
        .route(
            "/api/v1/templates/:id/preview",
            post(handlers::handle_preview_template),
        )
        // Log review
        .route("/api/v1/logs", get(logs::handlers::handle_list_logs))
        .route("/api/v1/logs/:name", get(logs::handlers::handle_get_log))
        // Chat assistant
        .route("/api/v1/chat", post(chat::handle_chat))
        .with_state(state)
}
