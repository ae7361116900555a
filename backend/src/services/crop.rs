//! Crop catalogue and AI crop recommendations

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use shared::{CropRecommendation, Language, LocalizedName};

use crate::error::{AppError, AppResult};
use crate::external::ai_advisor::AiAdvisorClient;
use crate::services::{SoilService, WeatherService};

/// Crop service
#[derive(Clone)]
pub struct CropService {
    db: PgPool,
    advisor: Option<AiAdvisorClient>,
}

/// Crop record
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Crop {
    pub id: i32,
    pub name: String,
    pub name_local: Json<LocalizedName>,
    pub category: String,
    pub season: String,
    pub planting_months: Json<Vec<String>>,
    pub harvest_days: i32,
    pub description: Option<String>,
}

/// Input for adding a crop
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCropInput {
    #[validate(length(min = 1, max = 100, message = "Crop name is required"))]
    pub name: String,
    pub name_local: Option<LocalizedName>,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[validate(length(min = 1, message = "Season is required"))]
    pub season: String,
    #[serde(default)]
    pub planting_months: Vec<String>,
    #[validate(range(min = 1, message = "Harvest days must be positive"))]
    pub harvest_days: i32,
    pub description: Option<String>,
}

/// Input for requesting crop recommendations
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    pub location: Option<String>,
    #[serde(default)]
    pub language: Language,
    pub user_id: Option<Uuid>,
}

impl CropService {
    /// Create a new CropService instance
    pub fn new(db: PgPool) -> Self {
        Self { db, advisor: None }
    }

    /// Create a CropService able to call the advisor
    pub fn with_advisor(db: PgPool, advisor: Option<AiAdvisorClient>) -> Self {
        Self { db, advisor }
    }

    /// List all crops
    pub async fn list_crops(&self) -> AppResult<Vec<Crop>> {
        let crops = sqlx::query_as::<_, Crop>(
            r#"
            SELECT id, name, name_local, category, season, planting_months, harvest_days, description
            FROM crops
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(crops)
    }

    /// Get a crop by ID
    pub async fn get_crop(&self, crop_id: i32) -> AppResult<Crop> {
        sqlx::query_as::<_, Crop>(
            r#"
            SELECT id, name, name_local, category, season, planting_months, harvest_days, description
            FROM crops
            WHERE id = $1
            "#,
        )
        .bind(crop_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Crop".to_string()))
    }

    /// Add a crop to the catalogue
    pub async fn create_crop(&self, input: CreateCropInput) -> AppResult<Crop> {
        input.validate()?;

        let name_local = input.name_local.unwrap_or_else(|| LocalizedName {
            en: input.name.clone(),
            ml: None,
            ta: None,
        });

        let crop = sqlx::query_as::<_, Crop>(
            r#"
            INSERT INTO crops (name, name_local, category, season, planting_months, harvest_days, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, name_local, category, season, planting_months, harvest_days, description
            "#,
        )
        .bind(&input.name)
        .bind(Json(name_local))
        .bind(&input.category)
        .bind(&input.season)
        .bind(Json(input.planting_months))
        .bind(input.harvest_days)
        .bind(&input.description)
        .fetch_one(&self.db)
        .await?;

        tracing::info!("Added crop {} ({})", crop.name, crop.id);
        Ok(crop)
    }

    /// Ask the advisor for recommendations using the latest stored weather and soil data
    pub async fn recommendations(
        &self,
        crop_id: i32,
        request: RecommendationRequest,
    ) -> AppResult<CropRecommendation> {
        let advisor = self.advisor.as_ref().ok_or(AppError::AiServiceUnavailable)?;
        let crop = self.get_crop(crop_id).await?;
        let location = request.location.unwrap_or_else(|| "Kochi".to_string());

        let weather = WeatherService::new(self.db.clone())
            .latest_weather(&location)
            .await?
            .map(|w| serde_json::to_value(w).unwrap_or_default());

        let soil = match request.user_id {
            Some(user_id) => SoilService::new(self.db.clone())
                .find_latest(user_id)
                .await?
                .map(|s| serde_json::to_value(s).unwrap_or_default()),
            None => None,
        };

        advisor
            .crop_recommendations(
                &crop.name,
                &location,
                weather.as_ref(),
                soil.as_ref(),
                request.language,
            )
            .await
    }
}
