//! Weather service: provider reports, farming advice, alerts and the weather cache

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use shared::insights::{generate_farming_advice, generate_weather_alerts};
use shared::{kph_to_mps, DailyForecast, WeatherReport, WeatherSnapshot};

use crate::error::{AppError, AppResult};
use crate::external::weather::WeatherClient;

/// Weather service for reports and cached readings
#[derive(Clone)]
pub struct WeatherService {
    db: PgPool,
    weather_client: Option<WeatherClient>,
}

/// Cached weather reading
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRecord {
    pub id: i32,
    pub location: String,
    pub temperature: Decimal,
    pub humidity: i32,
    /// km/h
    pub wind_speed: Decimal,
    pub condition: String,
    pub forecast: Json<Vec<DailyForecast>>,
    pub timestamp: DateTime<Utc>,
}

const FALLBACK_ADVICE: [&str; 3] = [
    "Good day for irrigation",
    "Avoid spraying pesticides",
    "Optimal for land preparation",
];

impl WeatherService {
    /// Create a new WeatherService instance
    pub fn new(db: PgPool) -> Self {
        Self {
            db,
            weather_client: None,
        }
    }

    /// Create a new WeatherService with weather API client
    pub fn with_client(db: PgPool, weather_client: Option<WeatherClient>) -> Self {
        Self { db, weather_client }
    }

    async fn fetch_snapshot(&self, location: &str) -> AppResult<WeatherSnapshot> {
        let client = self.weather_client.as_ref().ok_or_else(|| {
            AppError::WeatherServiceUnavailable("Weather API key not configured".to_string())
        })?;
        client.get_snapshot(location).await
    }

    /// Report with farming advice for a location, saved to the weather cache.
    ///
    /// Provider failures fall back to a typical Kerala report; a failed cache
    /// write is returned as an error.
    pub async fn weather_report(&self, location: &str) -> AppResult<WeatherReport> {
        let report = self.report_or_fallback(location).await;
        self.cache_report(&report).await?;
        Ok(report)
    }

    async fn report_or_fallback(&self, location: &str) -> WeatherReport {
        match self.fetch_snapshot(location).await {
            Ok(snapshot) => build_report(&snapshot),
            Err(e) => {
                tracing::warn!("Serving fallback weather for {}: {}", location, e);
                fallback_report(location, Utc::now())
            }
        }
    }

    /// Alerts for a location, empty when nothing is notable or weather is unavailable
    pub async fn weather_alerts(&self, location: &str) -> Vec<String> {
        let snapshot = match self.fetch_snapshot(location).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::debug!("Using fallback weather for alerts in {}: {}", location, e);
                fallback_snapshot(location, Utc::now())
            }
        };
        generate_weather_alerts(&snapshot)
    }

    /// Newest cached reading for a location
    pub async fn latest_weather(&self, location: &str) -> AppResult<Option<WeatherRecord>> {
        let record = sqlx::query_as::<_, WeatherRecord>(
            r#"
            SELECT id, location, temperature, humidity, wind_speed, condition, forecast, timestamp
            FROM weather_data
            WHERE location = $1
            ORDER BY timestamp DESC
            LIMIT 1
            "#,
        )
        .bind(location)
        .fetch_optional(&self.db)
        .await?;

        Ok(record)
    }

    async fn cache_report(&self, report: &WeatherReport) -> AppResult<WeatherRecord> {
        let record = sqlx::query_as::<_, WeatherRecord>(
            r#"
            INSERT INTO weather_data (location, temperature, humidity, wind_speed, condition, forecast)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, location, temperature, humidity, wind_speed, condition, forecast, timestamp
            "#,
        )
        .bind(&report.location)
        .bind(report.current.temperature)
        .bind(report.current.humidity)
        .bind(report.current.wind_speed)
        .bind(&report.current.condition)
        .bind(Json(&report.forecast))
        .fetch_one(&self.db)
        .await?;

        Ok(record)
    }
}

/// Client report for a snapshot
pub fn build_report(snapshot: &WeatherSnapshot) -> WeatherReport {
    WeatherReport {
        location: snapshot.location.clone(),
        current: snapshot.current_conditions(),
        forecast: snapshot.forecast.clone(),
        farming_advice: generate_farming_advice(snapshot),
    }
}

/// Typical monsoon-season conditions for a location
pub fn fallback_snapshot(location: &str, now: DateTime<Utc>) -> WeatherSnapshot {
    let today = now.date_naive();
    let days = [
        (32, 24, "Sunny", "01d"),
        (28, 22, "Rain", "10d"),
        (30, 23, "Cloudy", "03d"),
        (31, 25, "Partly Cloudy", "02d"),
        (33, 26, "Sunny", "01d"),
    ];

    let forecast = days
        .iter()
        .enumerate()
        .map(|(i, (high, low, condition, icon))| DailyForecast {
            date: today + Duration::days(i as i64),
            high: *high,
            low: *low,
            condition: condition.to_string(),
            icon: icon.to_string(),
        })
        .collect();

    WeatherSnapshot {
        location: location.to_string(),
        temperature_celsius: Decimal::from(28),
        condition: "Partly Cloudy".to_string(),
        humidity_percent: 78,
        wind_speed_mps: kph_to_mps(Decimal::from(12)),
        forecast,
    }
}

/// Fallback report with fixed general advice
pub fn fallback_report(location: &str, now: DateTime<Utc>) -> WeatherReport {
    let snapshot = fallback_snapshot(location, now);
    WeatherReport {
        location: snapshot.location.clone(),
        current: snapshot.current_conditions(),
        forecast: snapshot.forecast,
        farming_advice: FALLBACK_ADVICE.iter().map(|s| s.to_string()).collect(),
    }
}
