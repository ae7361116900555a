//! Weather data models

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Current conditions plus daily forecast for a location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub location: String,
    /// As reported by the provider, not rounded
    pub temperature_celsius: Decimal,
    pub condition: String,
    pub humidity_percent: i32,
    /// Wind speed in metres per second
    pub wind_speed_mps: Decimal,
    #[serde(default)]
    pub forecast: Vec<DailyForecast>,
}

/// Daily weather forecast
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub high: i32,
    pub low: i32,
    pub condition: String,
    #[serde(default)]
    pub icon: String,
}

/// Tips and alerts derived from one snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AdviceBundle {
    pub tips: Vec<String>,
    pub alerts: Vec<String>,
}

/// Current conditions as reported to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    pub temperature: Decimal,
    pub condition: String,
    pub humidity: i32,
    /// Wind speed in km/h
    pub wind_speed: Decimal,
}

/// Weather response for a location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub location: String,
    pub current: CurrentConditions,
    pub forecast: Vec<DailyForecast>,
    pub farming_advice: Vec<String>,
}

/// Round half away from zero to a whole number
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert metres per second to whole km/h
pub fn mps_to_kph(mps: Decimal) -> Decimal {
    round_whole(mps * Decimal::new(36, 1))
}

/// Convert whole km/h back to metres per second
pub fn kph_to_mps(kph: Decimal) -> Decimal {
    (kph / Decimal::new(36, 1)).round_dp(2)
}

impl WeatherSnapshot {
    /// Client-facing view of the current conditions
    pub fn current_conditions(&self) -> CurrentConditions {
        CurrentConditions {
            temperature: round_whole(self.temperature_celsius),
            condition: self.condition.clone(),
            humidity: self.humidity_percent,
            wind_speed: mps_to_kph(self.wind_speed_mps),
        }
    }
}
