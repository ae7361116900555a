//! HTTP handlers for plant disease detection

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use uuid::Uuid;

use shared::DiseaseAnalysis;

use crate::error::{AppError, AppResult};
use crate::services::disease::{DiseaseDetection, DiseaseService, UploadedImage};
use crate::AppState;

fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::invalid("image", e.body_text())
}

/// Analyze an uploaded plant photo (multipart fields `image` and optional `userId`)
pub async fn analyze_disease(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<DiseaseAnalysis>> {
    let mut image = None;
    let mut user_id = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some("image") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                image = Some(UploadedImage {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            Some("userId") => {
                let text = field.text().await.map_err(multipart_error)?;
                if !text.trim().is_empty() {
                    user_id = Some(
                        Uuid::parse_str(text.trim())
                            .map_err(|_| AppError::invalid("userId", "Invalid user ID"))?,
                    );
                }
            }
            _ => {}
        }
    }

    let image = image.ok_or_else(|| AppError::invalid("image", "No image uploaded"))?;
    let analysis = DiseaseService::new(state.db, state.advisor)
        .analyze(image, user_id, state.config.uploads.max_image_bytes)
        .await?;
    Ok(Json(analysis))
}

/// Latest detections for a user
pub async fn get_disease_history(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<Vec<DiseaseDetection>>> {
    let detections = DiseaseService::new(state.db, None).history(user_id).await?;
    Ok(Json(detections))
}
