//! Soil test records and soil recommendations

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use shared::{validate_organic_matter, validate_soil_ph, NutrientLevel};

use crate::error::{AppError, AppResult};
use crate::external::ai_advisor::AiAdvisorClient;

/// Soil service
#[derive(Clone)]
pub struct SoilService {
    db: PgPool,
    advisor: Option<AiAdvisorClient>,
}

/// Soil test record
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SoilTest {
    pub id: i32,
    pub user_id: Option<Uuid>,
    pub location: String,
    pub ph: Decimal,
    pub nitrogen: String,
    pub phosphorus: String,
    pub potassium: String,
    pub organic_matter: Option<Decimal>,
    pub recommendations: Option<String>,
    pub test_date: DateTime<Utc>,
}

/// Input for recording a soil test
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSoilTestInput {
    pub user_id: Option<Uuid>,
    #[validate(length(min = 1, max = 100, message = "Location is required"))]
    pub location: String,
    pub ph: Decimal,
    pub nitrogen: NutrientLevel,
    pub phosphorus: NutrientLevel,
    pub potassium: NutrientLevel,
    pub organic_matter: Option<Decimal>,
    /// Crop the recommendations should target
    pub crop: Option<String>,
}

/// Stored test plus advisor output
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoilTestResult {
    pub soil_test: SoilTest,
    pub recommendations: serde_json::Value,
}

impl CreateSoilTestInput {
    fn check(&self) -> AppResult<()> {
        self.validate()?;
        validate_soil_ph(self.ph).map_err(|m| AppError::invalid("ph", m))?;
        if let Some(om) = self.organic_matter {
            validate_organic_matter(om).map_err(|m| AppError::invalid("organicMatter", m))?;
        }
        Ok(())
    }
}

impl SoilService {
    /// Create a new SoilService instance
    pub fn new(db: PgPool) -> Self {
        Self { db, advisor: None }
    }

    /// Create a SoilService able to call the advisor
    pub fn with_advisor(db: PgPool, advisor: Option<AiAdvisorClient>) -> Self {
        Self { db, advisor }
    }

    /// Store a soil test and ask the advisor what to do about it
    pub async fn create_test(&self, input: CreateSoilTestInput) -> AppResult<SoilTestResult> {
        input.check()?;
        let advisor = self.advisor.as_ref().ok_or(AppError::AiServiceUnavailable)?;

        let soil_test = sqlx::query_as::<_, SoilTest>(
            r#"
            INSERT INTO soil_tests (user_id, location, ph, nitrogen, phosphorus, potassium, organic_matter)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, location, ph, nitrogen, phosphorus, potassium,
                      organic_matter, recommendations, test_date
            "#,
        )
        .bind(input.user_id)
        .bind(&input.location)
        .bind(input.ph)
        .bind(input.nitrogen.as_str())
        .bind(input.phosphorus.as_str())
        .bind(input.potassium.as_str())
        .bind(input.organic_matter)
        .fetch_one(&self.db)
        .await?;

        let test_json = serde_json::to_value(&soil_test).unwrap_or_default();
        let recommendations = advisor
            .soil_recommendations(&test_json, input.crop.as_deref())
            .await?;

        Ok(SoilTestResult {
            soil_test,
            recommendations,
        })
    }

    /// All soil tests for a user, newest first
    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<SoilTest>> {
        let tests = sqlx::query_as::<_, SoilTest>(
            r#"
            SELECT id, user_id, location, ph, nitrogen, phosphorus, potassium,
                   organic_matter, recommendations, test_date
            FROM soil_tests
            WHERE user_id = $1
            ORDER BY test_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(tests)
    }

    /// Latest soil test for a user, if any
    pub async fn find_latest(&self, user_id: Uuid) -> AppResult<Option<SoilTest>> {
        let test = sqlx::query_as::<_, SoilTest>(
            r#"
            SELECT id, user_id, location, ph, nitrogen, phosphorus, potassium,
                   organic_matter, recommendations, test_date
            FROM soil_tests
            WHERE user_id = $1
            ORDER BY test_date DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(test)
    }

    /// Latest soil test for a user
    pub async fn latest(&self, user_id: Uuid) -> AppResult<SoilTest> {
        self.find_latest(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Soil test".to_string()))
    }
}
