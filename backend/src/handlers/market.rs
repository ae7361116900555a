//! HTTP handlers for market prices

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use shared::CropMarketView;

use crate::error::AppResult;
use crate::services::market::{MarketPriceRecord, MarketService, RecordPriceInput};
use crate::AppState;

fn service(state: &AppState) -> MarketService {
    MarketService::new(state.db.clone(), state.config.market.clone())
}

/// Query parameters for market insights
#[derive(Debug, Deserialize)]
pub struct InsightsQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub insights: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub message: String,
    pub inserted: usize,
}

/// Market view for every crop with recorded prices
pub async fn get_market_prices(State(state): State<AppState>) -> Json<Vec<CropMarketView>> {
    Json(service(&state).market_overview(Utc::now()).await)
}

/// Combined market insights
pub async fn get_market_insights(
    State(state): State<AppState>,
    Query(query): Query<InsightsQuery>,
) -> Json<InsightsResponse> {
    let insights = service(&state)
        .market_insights(Utc::now(), query.limit)
        .await;
    Json(InsightsResponse { insights })
}

/// Record a price observation
pub async fn record_market_price(
    State(state): State<AppState>,
    Json(input): Json<RecordPriceInput>,
) -> AppResult<Json<MarketPriceRecord>> {
    let record = service(&state).record_price(input).await?;
    Ok(Json(record))
}

/// Refresh prices with simulated quotes
pub async fn update_market_prices(State(state): State<AppState>) -> AppResult<Json<UpdateResponse>> {
    let inserted = service(&state).simulate_price_update().await?;
    Ok(Json(UpdateResponse {
        message: "Market prices updated successfully".to_string(),
        inserted,
    }))
}
