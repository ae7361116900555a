//! Market price service
//!
//! Reads recent prices per crop and turns them into market views with trend
//! and insight text. Also feeds the price table with simulated quotes until a
//! real market feed is wired in.

use chrono::{DateTime, Datelike, Utc};
use rand::Rng;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use validator::Validate;

use shared::insights::{collect_insights, compute_crop_market_view, SeasonalRule};
use shared::{validate_market_price, validate_price_change, CropMarketView, PriceObservation};

use crate::config::MarketConfig;
use crate::error::{AppError, AppResult};
use crate::services::CropService;

/// Market service
#[derive(Clone)]
pub struct MarketService {
    db: PgPool,
    config: MarketConfig,
}

/// Stored price row
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MarketPriceRecord {
    pub id: i32,
    pub crop_id: i32,
    pub market: String,
    pub price: Decimal,
    pub unit: String,
    pub price_change: Option<Decimal>,
    pub timestamp: DateTime<Utc>,
}

impl From<&MarketPriceRecord> for PriceObservation {
    fn from(row: &MarketPriceRecord) -> Self {
        PriceObservation {
            market: row.market.clone(),
            price: row.price,
            unit: row.unit.clone(),
            change_percent: row.price_change.unwrap_or(Decimal::ZERO),
            observed_at: row.timestamp,
        }
    }
}

/// Input for recording a price
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordPriceInput {
    pub crop_id: i32,
    #[validate(length(min = 1, max = 100, message = "Market name is required"))]
    pub market: String,
    pub price: Decimal,
    #[validate(length(min = 1, max = 20, message = "Unit is required"))]
    pub unit: String,
    pub price_change: Option<Decimal>,
}

/// Price quote produced by the simulation
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedPrice {
    pub crop_id: i32,
    pub market: String,
    pub price: Decimal,
    pub unit: String,
    pub price_change: Decimal,
}

/// Typical wholesale price in rupees per unit
pub fn base_price_for(crop_name: &str) -> Decimal {
    match crop_name {
        "Rice" => Decimal::from(30),
        "Coconut" => Decimal::from(24),
        "Black Pepper" => Decimal::from(480),
        "Banana" => Decimal::from(15),
        "Rubber" => Decimal::from(150),
        "Cardamom" => Decimal::from(1200),
        "Ginger" => Decimal::from(80),
        "Turmeric" => Decimal::from(120),
        _ => Decimal::from(50),
    }
}

/// Unit a crop is traded in
pub fn unit_for(crop_name: &str) -> &'static str {
    match crop_name {
        "Coconut" => "piece",
        "Banana" => "dozen",
        _ => "kg",
    }
}

/// Quotes for every crop at every market: base price within ±10 %, change within ±5 %
pub fn simulate_prices<R: Rng>(
    crops: &[(i32, String)],
    markets: &[String],
    rng: &mut R,
) -> Vec<SimulatedPrice> {
    let mut quotes = Vec::with_capacity(crops.len() * markets.len());

    for (crop_id, name) in crops {
        let base = base_price_for(name);
        for market in markets {
            let variation = Decimal::from_f64(rng.gen_range(-0.1..0.1)).unwrap_or_default();
            let change = Decimal::from_f64(rng.gen_range(-5.0..5.0)).unwrap_or_default();
            quotes.push(SimulatedPrice {
                crop_id: *crop_id,
                market: market.clone(),
                price: (base * (Decimal::ONE + variation)).round_dp(2),
                unit: unit_for(name).to_string(),
                price_change: change.round_dp(2),
            });
        }
    }

    quotes
}

/// Built-in quotes used when stored prices cannot be read
fn fallback_observations(now: DateTime<Utc>) -> Vec<(i32, &'static str, Vec<PriceObservation>)> {
    let obs = |market: &str, price: i64, unit: &str, change: i64| PriceObservation {
        market: market.to_string(),
        price: Decimal::from(price),
        unit: unit.to_string(),
        change_percent: Decimal::from(change),
        observed_at: now,
    };

    vec![
        (
            1,
            "Rice",
            vec![
                obs("Kochi", 32, "kg", 5),
                obs("Trivandrum", 30, "kg", 3),
                obs("Kozhikode", 34, "kg", 8),
            ],
        ),
        (
            2,
            "Coconut",
            vec![
                obs("Kochi", 25, "piece", -2),
                obs("Trivandrum", 23, "piece", -1),
                obs("Kozhikode", 24, "piece", -3),
            ],
        ),
        (
            3,
            "Black Pepper",
            vec![
                obs("Kochi", 485, "kg", 8),
                obs("Trivandrum", 492, "kg", 12),
                obs("Kozhikode", 480, "kg", 5),
            ],
        ),
    ]
}

/// Market views for the built-in quotes
pub fn fallback_market_views(now: DateTime<Utc>, rules: &[SeasonalRule]) -> Vec<CropMarketView> {
    fallback_observations(now)
        .into_iter()
        .filter_map(|(id, name, observations)| {
            compute_crop_market_view(id, name, &observations, now.month(), rules)
        })
        .collect()
}

impl MarketService {
    /// Create a new MarketService instance
    pub fn new(db: PgPool, config: MarketConfig) -> Self {
        Self { db, config }
    }

    /// Most recent price rows for a crop, newest first
    pub async fn recent_prices(&self, crop_id: i32) -> AppResult<Vec<MarketPriceRecord>> {
        let rows = sqlx::query_as::<_, MarketPriceRecord>(
            r#"
            SELECT id, crop_id, market, price, unit, price_change, timestamp
            FROM market_prices
            WHERE crop_id = $1
            ORDER BY timestamp DESC
            LIMIT $2
            "#,
        )
        .bind(crop_id)
        .bind(self.config.history_limit)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    async fn load_views(&self, month: u32) -> AppResult<Vec<CropMarketView>> {
        let crops = CropService::new(self.db.clone()).list_crops().await?;
        let mut views = Vec::new();

        for crop in crops {
            let observations: Vec<PriceObservation> = self
                .recent_prices(crop.id)
                .await?
                .iter()
                .map(PriceObservation::from)
                .collect();

            if let Some(view) = compute_crop_market_view(
                crop.id,
                &crop.name,
                &observations,
                month,
                &self.config.seasonal_rules,
            ) {
                views.push(view);
            }
        }

        Ok(views)
    }

    /// Market view for every crop with recorded prices
    pub async fn market_overview(&self, now: DateTime<Utc>) -> Vec<CropMarketView> {
        match self.load_views(now.month()).await {
            Ok(views) => views,
            Err(e) => {
                tracing::warn!("Serving fallback market data: {}", e);
                fallback_market_views(now, &self.config.seasonal_rules)
            }
        }
    }

    /// Insights across all crops, capped at `limit`
    pub async fn market_insights(&self, now: DateTime<Utc>, limit: Option<usize>) -> Vec<String> {
        let views = self.market_overview(now).await;
        collect_insights(&views, limit.unwrap_or(self.config.insight_limit))
    }

    /// Record one price observation
    pub async fn record_price(&self, input: RecordPriceInput) -> AppResult<MarketPriceRecord> {
        input.validate()?;
        validate_market_price(input.price).map_err(|m| AppError::invalid("price", m))?;
        if let Some(change) = input.price_change {
            validate_price_change(change).map_err(|m| AppError::invalid("priceChange", m))?;
        }

        // 404 rather than a foreign key violation
        CropService::new(self.db.clone()).get_crop(input.crop_id).await?;

        let row = sqlx::query_as::<_, MarketPriceRecord>(
            r#"
            INSERT INTO market_prices (crop_id, market, price, unit, price_change)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, crop_id, market, price, unit, price_change, timestamp
            "#,
        )
        .bind(input.crop_id)
        .bind(&input.market)
        .bind(input.price)
        .bind(&input.unit)
        .bind(input.price_change)
        .fetch_one(&self.db)
        .await?;

        Ok(row)
    }

    /// Insert a simulated quote for every crop at every tracked market
    pub async fn simulate_price_update(&self) -> AppResult<usize> {
        let crops: Vec<(i32, String)> = CropService::new(self.db.clone())
            .list_crops()
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let quotes = simulate_prices(&crops, &self.config.tracked_markets, &mut rand::thread_rng());

        let mut tx = self.db.begin().await?;
        for quote in &quotes {
            sqlx::query(
                r#"
                INSERT INTO market_prices (crop_id, market, price, unit, price_change)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(quote.crop_id)
            .bind(&quote.market)
            .bind(quote.price)
            .bind(&quote.unit)
            .bind(quote.price_change)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        tracing::info!("Simulated {} market prices", quotes.len());
        Ok(quotes.len())
    }
}
