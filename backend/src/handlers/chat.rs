//! HTTP handlers for the farming assistant

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use shared::ChatReply;

use crate::error::AppResult;
use crate::services::chat::{ChatMessage, ChatRequest, ChatService};
use crate::AppState;

/// Query parameters for chat history
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

/// Send a message to the assistant
pub async fn send_chat_message(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> AppResult<Json<ChatReply>> {
    let reply = ChatService::new(state.db, state.advisor)
        .respond(request)
        .await?;
    Ok(Json(reply))
}

/// Chat history for a user
pub async fn get_chat_history(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<ChatMessage>>> {
    let history = ChatService::new(state.db, None)
        .history(user_id, query.limit)
        .await?;
    Ok(Json(history))
}
