//! HTTP handlers for farmer accounts

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::user::{CreateUserInput, User, UserService};
use crate::AppState;

/// Register a farmer
pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<CreateUserInput>,
) -> AppResult<Json<User>> {
    let user = UserService::new(state.db).create_user(input).await?;
    Ok(Json(user))
}

/// Get a user by ID
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<User>> {
    let user = UserService::new(state.db).get_user(user_id).await?;
    Ok(Json(user))
}
