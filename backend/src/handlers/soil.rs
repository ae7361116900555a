//! HTTP handlers for soil tests

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::soil::{CreateSoilTestInput, SoilService, SoilTest, SoilTestResult};
use crate::AppState;

/// Record a soil test and return recommendations
pub async fn create_soil_test(
    State(state): State<AppState>,
    Json(input): Json<CreateSoilTestInput>,
) -> AppResult<Json<SoilTestResult>> {
    let result = SoilService::with_advisor(state.db, state.advisor)
        .create_test(input)
        .await?;
    Ok(Json(result))
}

/// All soil tests for a user
pub async fn list_soil_tests(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<Vec<SoilTest>>> {
    let tests = SoilService::new(state.db).list_for_user(user_id).await?;
    Ok(Json(tests))
}

/// Latest soil test for a user
pub async fn get_latest_soil_test(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<SoilTest>> {
    let test = SoilService::new(state.db).latest(user_id).await?;
    Ok(Json(test))
}
