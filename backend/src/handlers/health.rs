//! Service health endpoint

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
    /// Live weather provider configured; otherwise reports use fallback data
    pub weather_provider: bool,
    pub advisor: bool,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "connected",
        Err(e) => {
            tracing::warn!("Health check database query failed: {}", e);
            "disconnected"
        }
    };

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        database,
        weather_provider: state.weather_client.is_some(),
        advisor: state.advisor.is_some(),
    })
}
