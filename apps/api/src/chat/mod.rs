//! Chat assistant backend: forwards a conversation to the LLM with a fixed
//! medical-assistant system prompt. The UI keeps the history; each request
//! carries the full conversation.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::ChatMessage;
use crate::logs::excerpt;
use crate::state::AppState;

/// System prompt for every assistant conversation.
pub const CHAT_SYSTEM: &str = "You are a helpful medical assistant specializing in discharge summaries. \
You can answer questions about medical terminology, best practices for discharge summaries, \
and how to use this application. Keep responses focused on medical discharge summaries \
and related healthcare topics. Be professional, accurate, and helpful.";

/// Longest user-message slice the interaction log may carry.
const CHAT_LOG_EXCERPT_LEN: usize = 50;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// POST /api/v1/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    validate_history(&request.messages)?;

    if let Some(last) = request.messages.iter().rev().find(|m| m.role == "user") {
        info!(
            "Chat interaction - User: {}",
            excerpt(&last.content, CHAT_LOG_EXCERPT_LEN)
        );
    }

    let reply = state.llm.complete(CHAT_SYSTEM, &request.messages).await?;
    Ok(Json(ChatResponse { reply }))
}

/// Only `user` and `assistant` turns are accepted; the system turn is fixed
/// server-side and callers must not inject their own.
fn validate_history(messages: &[ChatMessage]) -> Result<(), AppError> {
    if messages.is_empty() {
        return Err(AppError::Validation(
            "Chat history must contain at least one message".to_string(),
        ));
    }
    for message in messages {
        if message.role != "user" && message.role != "assistant" {
            return Err(AppError::Validation(format!(
                "Unsupported chat role: {}",
                message.role
            )));
        }
    }
    Ok(())
}
