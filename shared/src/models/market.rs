//! Market price models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One recorded price for a crop at a market
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceObservation {
    pub market: String,
    pub price: Decimal,
    pub unit: String,
    /// Percentage change reported with the price, 0 when unknown
    pub change_percent: Decimal,
    pub observed_at: DateTime<Utc>,
}

/// Latest known price for a crop at one market
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketSnapshot {
    pub market: String,
    pub price: Decimal,
    pub unit: String,
    #[serde(rename = "change")]
    pub change_percent: Decimal,
    #[serde(rename = "timestamp")]
    pub observed_at: DateTime<Utc>,
}

impl From<&PriceObservation> for MarketSnapshot {
    fn from(obs: &PriceObservation) -> Self {
        MarketSnapshot {
            market: obs.market.clone(),
            price: obs.price,
            unit: obs.unit.clone(),
            change_percent: obs.change_percent,
            observed_at: obs.observed_at,
        }
    }
}

/// Aggregate price direction for a crop across its markets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MarketTrend {
    Up,
    Down,
    Stable,
}

impl std::fmt::Display for MarketTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketTrend::Up => write!(f, "up"),
            MarketTrend::Down => write!(f, "down"),
            MarketTrend::Stable => write!(f, "stable"),
        }
    }
}

/// Per-crop market view served to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CropMarketView {
    pub crop_id: i32,
    pub crop_name: String,
    pub markets: Vec<MarketSnapshot>,
    pub trend: MarketTrend,
    pub insights: Vec<String>,
}
