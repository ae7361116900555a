//! WebAssembly module for Krishi Sahayi
//!
//! Lets the web client compute market views, farming tips and weather alerts
//! offline, with the same rules the server uses. Inputs and outputs are JSON
//! strings; errors surface as JavaScript strings.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use shared::insights::{
    classify_mean_change, compute_crop_market_view, default_seasonal_rules,
    generate_farming_advice, generate_weather_alerts,
};
use shared::{PriceObservation, WeatherSnapshot};

// Re-export shared types for Rust consumers of the rlib
pub use shared::models::*;
pub use shared::types::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str("krishi-sahayi wasm ready"));
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization failed: {}", e))
}

fn parse_snapshot(snapshot_json: &str) -> Result<WeatherSnapshot, String> {
    serde_json::from_str(snapshot_json).map_err(|e| format!("Invalid weather JSON: {}", e))
}

fn market_view_json(
    crop_id: i32,
    crop_name: &str,
    observations_json: &str,
    month: u32,
) -> Result<String, String> {
    if !(1..=12).contains(&month) {
        return Err(format!("Invalid month: {}", month));
    }
    let observations: Vec<PriceObservation> = serde_json::from_str(observations_json)
        .map_err(|e| format!("Invalid observations JSON: {}", e))?;

    let view = compute_crop_market_view(
        crop_id,
        crop_name,
        &observations,
        month,
        &default_seasonal_rules(),
    );
    to_json(&view)
}

fn trend_for_changes(changes_json: &str) -> Result<String, String> {
    let changes: Vec<Decimal> =
        serde_json::from_str(changes_json).map_err(|e| format!("Invalid changes JSON: {}", e))?;
    if changes.is_empty() {
        return Err("At least one price change is required".to_string());
    }

    let mean = changes
        .iter()
        .try_fold(Decimal::ZERO, |acc, c| acc.checked_add(*c))
        .and_then(|total| total.checked_div(Decimal::from(changes.len())))
        .ok_or_else(|| "Price changes are too large".to_string())?;
    Ok(classify_mean_change(mean).to_string())
}

/// Market view for one crop. Returns "null" when there are no observations.
#[wasm_bindgen]
pub fn compute_market_view(
    crop_id: i32,
    crop_name: &str,
    observations_json: &str,
    month: u32,
) -> Result<String, JsValue> {
    market_view_json(crop_id, crop_name, observations_json, month).map_err(|e| JsValue::from_str(&e))
}

/// Market view using the browser's current month
#[wasm_bindgen]
pub fn compute_market_view_now(
    crop_id: i32,
    crop_name: &str,
    observations_json: &str,
) -> Result<String, JsValue> {
    let month = js_sys::Date::new_0().get_month() + 1;
    compute_market_view(crop_id, crop_name, observations_json, month)
}

/// Farming tips for a weather snapshot, as a JSON array
#[wasm_bindgen]
pub fn farming_advice(snapshot_json: &str) -> Result<String, JsValue> {
    parse_snapshot(snapshot_json)
        .and_then(|s| to_json(&generate_farming_advice(&s)))
        .map_err(|e| JsValue::from_str(&e))
}

/// Weather alerts as a JSON array; empty means no banner
#[wasm_bindgen]
pub fn weather_alerts(snapshot_json: &str) -> Result<String, JsValue> {
    parse_snapshot(snapshot_json)
        .and_then(|s| to_json(&generate_weather_alerts(&s)))
        .map_err(|e| JsValue::from_str(&e))
}

/// "up", "down" or "stable" for a JSON array of percentage changes
#[wasm_bindgen]
pub fn classify_price_trend(changes_json: &str) -> Result<String, JsValue> {
    trend_for_changes(changes_json).map_err(|e| JsValue::from_str(&e))
}

/// Check a soil pH reading before submitting a test
#[wasm_bindgen]
pub fn validate_soil_ph(ph: f64) -> bool {
    Decimal::from_f64(ph)
        .map(|ph| shared::validate_soil_ph(ph).is_ok())
        .unwrap_or(false)
}

/// Whether a pH suits most Kerala crops
#[wasm_bindgen]
pub fn is_ideal_ph(ph: f64) -> bool {
    Decimal::from_f64(ph)
        .map(shared::is_ideal_kerala_ph)
        .unwrap_or(false)
}
