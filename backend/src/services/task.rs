//! Farming task service

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use shared::TaskPriority;

use crate::error::{AppError, AppResult};

/// Window for upcoming tasks
pub const UPCOMING_DAYS: i64 = 7;

/// Farming task service
#[derive(Clone)]
pub struct TaskService {
    db: PgPool,
}

/// Farming task record
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FarmingTask {
    pub id: i32,
    pub user_id: Option<Uuid>,
    pub crop_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    pub completed: bool,
    pub priority: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a task
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskInput {
    pub user_id: Option<Uuid>,
    pub crop_id: Option<i32>,
    #[validate(length(min = 1, max = 200, message = "Task title is required"))]
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub priority: TaskPriority,
}

/// Input for marking a task done or not done
#[derive(Debug, Deserialize)]
pub struct SetCompletionInput {
    pub completed: bool,
}

impl TaskService {
    /// Create a new TaskService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// All tasks for a user, latest due date first
    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<FarmingTask>> {
        let tasks = sqlx::query_as::<_, FarmingTask>(
            r#"
            SELECT id, user_id, crop_id, title, description, due_date, completed, priority, created_at
            FROM farming_tasks
            WHERE user_id = $1
            ORDER BY due_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(tasks)
    }

    /// Incomplete tasks due within the next week, soonest first
    pub async fn upcoming(&self, user_id: Uuid, now: DateTime<Utc>) -> AppResult<Vec<FarmingTask>> {
        let tasks = sqlx::query_as::<_, FarmingTask>(
            r#"
            SELECT id, user_id, crop_id, title, description, due_date, completed, priority, created_at
            FROM farming_tasks
            WHERE user_id = $1
              AND completed = FALSE
              AND due_date >= $2
              AND due_date <= $3
            ORDER BY due_date ASC
            "#,
        )
        .bind(user_id)
        .bind(now)
        .bind(now + Duration::days(UPCOMING_DAYS))
        .fetch_all(&self.db)
        .await?;

        Ok(tasks)
    }

    /// Create a task
    pub async fn create_task(&self, input: CreateTaskInput) -> AppResult<FarmingTask> {
        input.validate()?;

        let task = sqlx::query_as::<_, FarmingTask>(
            r#"
            INSERT INTO farming_tasks (user_id, crop_id, title, description, due_date, priority)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, crop_id, title, description, due_date, completed, priority, created_at
            "#,
        )
        .bind(input.user_id)
        .bind(input.crop_id)
        .bind(input.title.trim())
        .bind(&input.description)
        .bind(input.due_date)
        .bind(input.priority.as_str())
        .fetch_one(&self.db)
        .await?;

        Ok(task)
    }

    /// Mark a task complete or incomplete
    pub async fn set_completion(&self, task_id: i32, completed: bool) -> AppResult<FarmingTask> {
        sqlx::query_as::<_, FarmingTask>(
            r#"
            UPDATE farming_tasks
            SET completed = $2
            WHERE id = $1
            RETURNING id, user_id, crop_id, title, description, due_date, completed, priority, created_at
            "#,
        )
        .bind(task_id)
        .bind(completed)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Task".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_defaults_to_medium() {
        let input: CreateTaskInput = serde_json::from_str(
            r#"{"title": "Apply lime", "dueDate": "2024-06-03T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(input.priority, TaskPriority::Medium);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_empty_title_rejected() {
        let input: CreateTaskInput =
            serde_json::from_str(r#"{"title": "", "dueDate": "2024-06-03T00:00:00Z"}"#).unwrap();
        assert!(input.validate().is_err());
    }
}
