//! HTTP handlers for farming tasks

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::task::{CreateTaskInput, FarmingTask, SetCompletionInput, TaskService};
use crate::AppState;

/// All tasks for a user
pub async fn list_tasks(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<Vec<FarmingTask>>> {
    let tasks = TaskService::new(state.db).list_for_user(user_id).await?;
    Ok(Json(tasks))
}

/// Tasks due in the coming week
pub async fn list_upcoming_tasks(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<Vec<FarmingTask>>> {
    let tasks = TaskService::new(state.db)
        .upcoming(user_id, Utc::now())
        .await?;
    Ok(Json(tasks))
}

/// Create a task
pub async fn create_task(
    State(state): State<AppState>,
    Json(input): Json<CreateTaskInput>,
) -> AppResult<Json<FarmingTask>> {
    let task = TaskService::new(state.db).create_task(input).await?;
    Ok(Json(task))
}

/// Mark a task complete or incomplete
pub async fn set_task_completion(
    State(state): State<AppState>,
    Path(task_id): Path<i32>,
    Json(input): Json<SetCompletionInput>,
) -> AppResult<Json<FarmingTask>> {
    let task = TaskService::new(state.db)
        .set_completion(task_id, input.completed)
        .await?;
    Ok(Json(task))
}
