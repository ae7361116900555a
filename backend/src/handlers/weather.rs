//! HTTP handlers for weather endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use shared::{validate_location, WeatherReport};

use crate::error::{AppError, AppResult};
use crate::services::weather::{WeatherRecord, WeatherService};
use crate::AppState;

/// Weather alerts response
#[derive(Debug, Serialize)]
pub struct AlertsResponse {
    pub alerts: Vec<String>,
}

fn service(state: &AppState) -> WeatherService {
    WeatherService::with_client(state.db.clone(), state.weather_client.clone())
}

fn check_location(location: &str) -> AppResult<()> {
    validate_location(location).map_err(|m| AppError::invalid("location", m))
}

/// Current conditions, forecast and farming advice for a location
pub async fn get_weather_report(
    State(state): State<AppState>,
    Path(location): Path<String>,
) -> AppResult<Json<WeatherReport>> {
    check_location(&location)?;
    let report = service(&state).weather_report(&location).await?;
    Ok(Json(report))
}

/// Weather alerts for a location
pub async fn get_weather_alerts(
    State(state): State<AppState>,
    Path(location): Path<String>,
) -> AppResult<Json<AlertsResponse>> {
    check_location(&location)?;
    let alerts = service(&state).weather_alerts(&location).await;
    Ok(Json(AlertsResponse { alerts }))
}

/// Most recent cached reading for a location
pub async fn get_latest_weather(
    State(state): State<AppState>,
    Path(location): Path<String>,
) -> AppResult<Json<WeatherRecord>> {
    let record = service(&state)
        .latest_weather(&location)
        .await?
        .ok_or_else(|| AppError::NotFound("Weather data".to_string()))?;
    Ok(Json(record))
}
