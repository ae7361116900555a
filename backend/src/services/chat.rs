//! Farming assistant chat

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use shared::{ChatReply, Language};

use crate::error::{AppError, AppResult};
use crate::external::ai_advisor::{AiAdvisorClient, ChatContext};
use crate::services::{SoilService, TaskService};

/// History rows returned when no limit is given
pub const DEFAULT_HISTORY_LIMIT: i64 = 20;

const DEFAULT_LOCATION: &str = "Kochi";

/// Chat service
#[derive(Clone)]
pub struct ChatService {
    db: PgPool,
    advisor: Option<AiAdvisorClient>,
}

/// Stored chat exchange
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: i32,
    pub user_id: Option<Uuid>,
    pub message: String,
    pub response: Option<String>,
    pub language: String,
    pub timestamp: DateTime<Utc>,
}

/// Incoming chat message
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub user_id: Option<Uuid>,
    #[validate(length(min = 1, max = 2000, message = "Message is required"))]
    pub message: String,
    #[serde(default)]
    pub language: Language,
    pub location: Option<String>,
}

impl ChatService {
    /// Create a new ChatService instance
    pub fn new(db: PgPool, advisor: Option<AiAdvisorClient>) -> Self {
        Self { db, advisor }
    }

    async fn build_context(&self, request: &ChatRequest) -> AppResult<ChatContext> {
        let (recent_tasks, soil_data) = match request.user_id {
            Some(user_id) => {
                let tasks = TaskService::new(self.db.clone())
                    .upcoming(user_id, Utc::now())
                    .await?;
                let soil = SoilService::new(self.db.clone()).find_latest(user_id).await?;
                (
                    tasks
                        .iter()
                        .filter_map(|t| serde_json::to_value(t).ok())
                        .collect(),
                    soil.and_then(|s| serde_json::to_value(s).ok()),
                )
            }
            None => (Vec::new(), None),
        };

        Ok(ChatContext {
            recent_tasks,
            soil_data,
            location: request
                .location
                .clone()
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
        })
    }

    /// Answer a farmer's message, saving the exchange for known users
    pub async fn respond(&self, request: ChatRequest) -> AppResult<ChatReply> {
        request.validate()?;
        let advisor = self.advisor.as_ref().ok_or(AppError::AiServiceUnavailable)?;

        let context = self.build_context(&request).await?;
        let reply = advisor
            .chat_response(&request.message, &context, request.language)
            .await?;

        if let Some(user_id) = request.user_id {
            sqlx::query(
                r#"
                INSERT INTO chat_messages (user_id, message, response, language)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(user_id)
            .bind(&request.message)
            .bind(&reply.response)
            .bind(request.language.code())
            .execute(&self.db)
            .await?;
        }

        Ok(reply)
    }

    /// Chat history for a user, newest first
    pub async fn history(&self, user_id: Uuid, limit: Option<i64>) -> AppResult<Vec<ChatMessage>> {
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
        if limit < 1 {
            return Err(AppError::invalid("limit", "Limit must be at least 1"));
        }

        let messages = sqlx::query_as::<_, ChatMessage>(
            r#"
            SELECT id, user_id, message, response, language, timestamp
            FROM chat_messages
            WHERE user_id = $1
            ORDER BY timestamp DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(messages)
    }
}
