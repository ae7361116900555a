//! Plant disease detection from uploaded photos

use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::DiseaseAnalysis;

use crate::error::{AppError, AppResult};
use crate::external::ai_advisor::AiAdvisorClient;

/// Detections returned by the history endpoint
pub const HISTORY_LIMIT: i64 = 10;

/// Disease detection service
#[derive(Clone)]
pub struct DiseaseService {
    db: PgPool,
    advisor: Option<AiAdvisorClient>,
}

/// Stored detection
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseDetection {
    pub id: i32,
    pub user_id: Option<Uuid>,
    pub image_name: String,
    pub detected_disease: Option<String>,
    pub confidence: Option<Decimal>,
    pub treatment: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Photo received from the client
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    /// Reject non-images, empty uploads and oversized files
    pub fn check(&self, max_bytes: usize) -> AppResult<()> {
        if !self.content_type.starts_with("image/") {
            return Err(AppError::invalid("image", "Only image files are allowed"));
        }
        if self.bytes.is_empty() {
            return Err(AppError::invalid("image", "No image uploaded"));
        }
        if self.bytes.len() > max_bytes {
            return Err(AppError::invalid(
                "image",
                format!("Image must be at most {} MB", max_bytes / (1024 * 1024)),
            ));
        }
        Ok(())
    }
}

impl DiseaseService {
    /// Create a new DiseaseService instance
    pub fn new(db: PgPool, advisor: Option<AiAdvisorClient>) -> Self {
        Self { db, advisor }
    }

    /// Diagnose a plant photo, saving the result for known users
    pub async fn analyze(
        &self,
        image: UploadedImage,
        user_id: Option<Uuid>,
        max_bytes: usize,
    ) -> AppResult<DiseaseAnalysis> {
        image.check(max_bytes)?;
        let advisor = self.advisor.as_ref().ok_or(AppError::AiServiceUnavailable)?;

        let analysis = advisor.analyze_plant_disease(&image.bytes).await?;
        tracing::info!(
            "Analyzed {} ({} bytes): {}",
            image.file_name,
            image.bytes.len(),
            analysis.disease
        );

        if let Some(user_id) = user_id {
            sqlx::query(
                r#"
                INSERT INTO disease_detections (user_id, image_name, detected_disease, confidence, treatment)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(user_id)
            .bind(&image.file_name)
            .bind(&analysis.disease)
            .bind(Decimal::from_f64(analysis.confidence.clamp(0.0, 100.0)).map(|c| c.round_dp(2)))
            .bind(analysis.treatment.join("; "))
            .execute(&self.db)
            .await?;
        }

        Ok(analysis)
    }

    /// Latest detections for a user
    pub async fn history(&self, user_id: Uuid) -> AppResult<Vec<DiseaseDetection>> {
        let detections = sqlx::query_as::<_, DiseaseDetection>(
            r#"
            SELECT id, user_id, image_name, detected_disease, confidence, treatment, timestamp
            FROM disease_detections
            WHERE user_id = $1
            ORDER BY timestamp DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(HISTORY_LIMIT)
        .fetch_all(&self.db)
        .await?;

        Ok(detections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(content_type: &str, len: usize) -> UploadedImage {
        UploadedImage {
            file_name: "leaf.jpg".to_string(),
            content_type: content_type.to_string(),
            bytes: vec![0xFF; len],
        }
    }

    #[test]
    fn test_accepts_images_within_limit() {
        assert!(image("image/jpeg", 1024).check(10 * 1024 * 1024).is_ok());
        assert!(image("image/png", 2048).check(2048).is_ok());
    }

    #[test]
    fn test_rejects_non_images() {
        let err = image("application/pdf", 10).check(1024).unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[test]
    fn test_rejects_oversized_and_empty() {
        assert!(image("image/jpeg", 2049).check(2048).is_err());
        assert!(image("image/jpeg", 0).check(2048).is_err());
    }
}
