//! Weather API client for fetching weather data
//!
//! Integrates with OpenWeatherMap API for current conditions and forecasts

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate};
use reqwest::Client;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use shared::{DailyForecast, WeatherSnapshot};

use crate::error::{AppError, AppResult};

/// Forecast days kept from the 3-hourly feed
pub const FORECAST_DAYS: usize = 5;

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// OpenWeatherMap API response for current weather
#[derive(Debug, Deserialize)]
struct OWMCurrentResponse {
    name: String,
    weather: Vec<OWMWeather>,
    main: OWMMain,
    wind: OWMWind,
}

#[derive(Debug, Deserialize)]
struct OWMWeather {
    main: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OWMMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: i32,
}

#[derive(Debug, Deserialize)]
struct OWMWind {
    speed: f64,
}

/// OpenWeatherMap API response for forecast
#[derive(Debug, Deserialize)]
struct OWMForecastResponse {
    list: Vec<OWMForecastItem>,
}

#[derive(Debug, Deserialize)]
struct OWMForecastItem {
    dt: i64,
    main: OWMMain,
    weather: Vec<OWMWeather>,
}

fn decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

fn whole_degrees(value: f64) -> i32 {
    value.round() as i32
}

impl WeatherClient {
    /// Create a client for the configured endpoint
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, location: &str) -> AppResult<T> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .query(&[("q", location), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await
            .map_err(|e| {
                AppError::WeatherServiceUnavailable(format!("Weather API request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::WeatherServiceUnavailable(format!(
                "Weather API error: {} - {}",
                status, body
            )));
        }

        response.json().await.map_err(|e| {
            AppError::WeatherServiceUnavailable(format!("Failed to parse weather response: {}", e))
        })
    }

    /// Fetch current conditions and the daily forecast for a city
    pub async fn get_snapshot(&self, location: &str) -> AppResult<WeatherSnapshot> {
        let current: OWMCurrentResponse = self.get_json("weather", location).await?;
        let forecast: OWMForecastResponse = self.get_json("forecast", location).await?;

        tracing::debug!(
            "Fetched weather for {} ({} forecast readings)",
            current.name,
            forecast.list.len()
        );

        Ok(convert_snapshot(current, forecast))
    }
}

/// Convert OpenWeatherMap responses to our snapshot
fn convert_snapshot(current: OWMCurrentResponse, forecast: OWMForecastResponse) -> WeatherSnapshot {
    WeatherSnapshot {
        location: current.name,
        // Unrounded: advice thresholds compare the provider reading
        temperature_celsius: decimal(current.main.temp),
        condition: current
            .weather
            .first()
            .map(|w| w.main.clone())
            .unwrap_or_default(),
        humidity_percent: current.main.humidity,
        wind_speed_mps: decimal(current.wind.speed),
        forecast: daily_forecast(&forecast.list),
    }
}

/// First reading of each UTC date, at most `FORECAST_DAYS` days
fn daily_forecast(items: &[OWMForecastItem]) -> Vec<DailyForecast> {
    let mut seen: HashSet<NaiveDate> = HashSet::new();
    let mut days = Vec::new();

    for item in items {
        if days.len() >= FORECAST_DAYS {
            break;
        }
        let Some(date) = DateTime::from_timestamp(item.dt, 0).map(|ts| ts.date_naive()) else {
            continue;
        };
        if !seen.insert(date) {
            continue;
        }
        let weather = item.weather.first();
        days.push(DailyForecast {
            date,
            high: whole_degrees(item.main.temp_max),
            low: whole_degrees(item.main.temp_min),
            condition: weather.map(|w| w.main.clone()).unwrap_or_default(),
            icon: weather.map(|w| w.icon.clone()).unwrap_or_default(),
        });
    }

    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::insights::{generate_farming_advice, generate_weather_alerts};

    fn item(dt: i64, min: f64, max: f64, condition: &str) -> OWMForecastItem {
        OWMForecastItem {
            dt,
            main: OWMMain {
                temp: (min + max) / 2.0,
                temp_min: min,
                temp_max: max,
                humidity: 80,
            },
            weather: vec![OWMWeather {
                main: condition.to_string(),
                icon: "10d".to_string(),
            }],
        }
    }

    #[test]
    fn test_daily_forecast_takes_first_reading_per_day() {
        // 2024-06-01T00:00Z and three hours later, then the next day
        let items = vec![
            item(1_717_200_000, 24.4, 31.6, "Rain"),
            item(1_717_210_800, 20.0, 40.0, "Clear"),
            item(1_717_286_400, 23.0, 29.5, "Clouds"),
        ];
        let days = daily_forecast(&items);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].condition, "Rain");
        assert_eq!(days[0].high, 32);
        assert_eq!(days[0].low, 24);
        assert_eq!(days[1].date, NaiveDate::from_ymd_opt(2024, 6, 2).unwrap());
        assert_eq!(days[1].high, 30);
    }

    #[test]
    fn test_daily_forecast_caps_days() {
        let items: Vec<OWMForecastItem> = (0..8)
            .map(|d| item(1_717_200_000 + d * 86_400, 22.0, 30.0, "Clear"))
            .collect();
        assert_eq!(daily_forecast(&items).len(), FORECAST_DAYS);
    }

    #[test]
    fn test_convert_snapshot_parses_payload() {
        let current: OWMCurrentResponse = serde_json::from_str(
            r#"{
                "name": "Kochi",
                "weather": [{"main": "Clouds", "description": "broken clouds", "icon": "04d"}],
                "main": {"temp": 28.6, "feels_like": 32.1, "temp_min": 28.0, "temp_max": 29.0,
                         "pressure": 1008, "humidity": 79},
                "wind": {"speed": 3.6, "deg": 250}
            }"#,
        )
        .unwrap();
        let forecast = OWMForecastResponse { list: vec![] };

        let snapshot = convert_snapshot(current, forecast);
        assert_eq!(snapshot.location, "Kochi");
        assert_eq!(snapshot.current_conditions().temperature, Decimal::from(29));
        assert_eq!(snapshot.humidity_percent, 79);
        assert_eq!(snapshot.condition, "Clouds");
        assert_eq!(snapshot.current_conditions().wind_speed, Decimal::from(13));
    }

    fn current_at(temp: f64) -> OWMCurrentResponse {
        OWMCurrentResponse {
            name: "Palakkad".to_string(),
            weather: vec![OWMWeather {
                main: "Clear".to_string(),
                icon: "01d".to_string(),
            }],
            main: OWMMain {
                temp,
                temp_min: temp - 1.0,
                temp_max: temp + 1.0,
                humidity: 60,
            },
            wind: OWMWind { speed: 2.0 },
        }
    }

    #[test]
    fn test_advice_sees_unrounded_temperature() {
        let hot = convert_snapshot(current_at(35.4), OWMForecastResponse { list: vec![] });
        assert_eq!(hot.current_conditions().temperature, Decimal::from(35));
        let advice = generate_farming_advice(&hot);
        assert_eq!(advice[0], "Very hot day - increase irrigation frequency");
        assert_eq!(advice[1], "Provide shade for sensitive crops");

        let cool = convert_snapshot(current_at(19.6), OWMForecastResponse { list: vec![] });
        assert_eq!(cool.current_conditions().temperature, Decimal::from(20));
        assert_eq!(
            generate_farming_advice(&cool)[0],
            "Cool weather - reduce watering"
        );
    }

    #[test]
    fn test_alerts_use_displayed_temperature() {
        // 38.4 shows as 38, which is not above the extreme heat limit
        let snapshot = convert_snapshot(current_at(38.4), OWMForecastResponse { list: vec![] });
        assert!(generate_weather_alerts(&snapshot).is_empty());

        let snapshot = convert_snapshot(current_at(38.5), OWMForecastResponse { list: vec![] });
        assert_eq!(
            generate_weather_alerts(&snapshot),
            vec!["Extreme heat warning - protect crops and livestock".to_string()]
        );
    }
}
