//! HTTP handlers for the crop catalogue

use axum::{
    extract::{Path, State},
    Json,
};

use shared::CropRecommendation;

use crate::error::AppResult;
use crate::services::crop::{CreateCropInput, Crop, CropService, RecommendationRequest};
use crate::AppState;

/// List all crops
pub async fn list_crops(State(state): State<AppState>) -> AppResult<Json<Vec<Crop>>> {
    let crops = CropService::new(state.db).list_crops().await?;
    Ok(Json(crops))
}

/// Get a crop by ID
pub async fn get_crop(
    State(state): State<AppState>,
    Path(crop_id): Path<i32>,
) -> AppResult<Json<Crop>> {
    let crop = CropService::new(state.db).get_crop(crop_id).await?;
    Ok(Json(crop))
}

/// Add a crop
pub async fn create_crop(
    State(state): State<AppState>,
    Json(input): Json<CreateCropInput>,
) -> AppResult<Json<Crop>> {
    let crop = CropService::new(state.db).create_crop(input).await?;
    Ok(Json(crop))
}

/// AI recommendations for a crop
pub async fn get_crop_recommendations(
    State(state): State<AppState>,
    Path(crop_id): Path<i32>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<CropRecommendation>> {
    let recommendations = CropService::with_advisor(state.db, state.advisor)
        .recommendations(crop_id, request)
        .await?;
    Ok(Json(recommendations))
}
