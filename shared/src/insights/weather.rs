//! Threshold rules turning weather into farming tips and alerts

use rust_decimal::Decimal;

use crate::models::{round_whole, AdviceBundle, DailyForecast, WeatherSnapshot};

const HOT_DAY_CELSIUS: i64 = 35;
const COOL_DAY_CELSIUS: i64 = 20;
const HUMID_PERCENT: i32 = 80;
const DRY_PERCENT: i32 = 50;
const SPRAY_WIND_LIMIT_MPS: i64 = 5;

const EXTREME_HEAT_CELSIUS: i64 = 38;
const DISEASE_RISK_HUMIDITY: i32 = 85;
const DISEASE_RISK_CELSIUS: i64 = 30;

fn forecast_mentions(forecast: &[DailyForecast], words: &[&str]) -> bool {
    forecast.iter().any(|day| {
        let condition = day.condition.to_lowercase();
        words.iter().any(|w| condition.contains(w))
    })
}

/// Farming tips for the snapshot.
///
/// Temperature, humidity, wind and forecast rules are evaluated independently
/// and their tips appended in that order.
pub fn generate_farming_advice(weather: &WeatherSnapshot) -> Vec<String> {
    let mut advice = Vec::new();
    let temp = weather.temperature_celsius;

    if temp > Decimal::from(HOT_DAY_CELSIUS) {
        advice.push("Very hot day - increase irrigation frequency".to_string());
        advice.push("Provide shade for sensitive crops".to_string());
    } else if temp < Decimal::from(COOL_DAY_CELSIUS) {
        advice.push("Cool weather - reduce watering".to_string());
        advice.push("Good time for land preparation".to_string());
    } else {
        advice.push("Optimal temperature for most field activities".to_string());
    }

    if weather.humidity_percent > HUMID_PERCENT {
        advice.push("High humidity - monitor for fungal diseases".to_string());
        advice.push("Ensure good air circulation in crops".to_string());
    } else if weather.humidity_percent < DRY_PERCENT {
        advice.push("Low humidity - increase irrigation".to_string());
    }

    if weather.wind_speed_mps > Decimal::from(SPRAY_WIND_LIMIT_MPS) {
        advice.push("Windy conditions - avoid spraying operations".to_string());
    } else {
        advice.push("Calm weather - good for spraying pesticides/fertilizers".to_string());
    }

    if forecast_mentions(&weather.forecast, &["rain", "storm"]) {
        advice.push("Rain expected - postpone irrigation".to_string());
        advice.push("Ensure proper drainage in fields".to_string());
    }

    advice
}

/// Warnings for the snapshot. An empty list means there is nothing to show.
///
/// Temperature checks use the whole-degree value shown to the farmer.
pub fn generate_weather_alerts(weather: &WeatherSnapshot) -> Vec<String> {
    let mut alerts = Vec::new();
    let temp = round_whole(weather.temperature_celsius);

    if temp > Decimal::from(EXTREME_HEAT_CELSIUS) {
        alerts.push("Extreme heat warning - protect crops and livestock".to_string());
    }

    if weather.humidity_percent > DISEASE_RISK_HUMIDITY && temp > Decimal::from(DISEASE_RISK_CELSIUS)
    {
        alerts.push("High humidity and temperature - disease risk increased".to_string());
    }

    if forecast_mentions(&weather.forecast, &["rain"]) {
        alerts.push("Heavy rainfall expected - consider postponing field work".to_string());
    }

    alerts
}

/// Tips and alerts together
pub fn advise(weather: &WeatherSnapshot) -> AdviceBundle {
    AdviceBundle {
        tips: generate_farming_advice(weather),
        alerts: generate_weather_alerts(weather),
    }
}
