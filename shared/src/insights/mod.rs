//! Market and weather insight generation

pub mod market;
pub mod weather;

pub use market::{
    aggregate_prices, best_market_note, classify_mean_change, classify_trend, collect_insights,
    compute_crop_market_view, default_seasonal_rules, generate_market_insights, mean_change,
    SeasonalRule,
};
pub use weather::{advise, generate_farming_advice, generate_weather_alerts};
