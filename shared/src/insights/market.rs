//! Market price aggregation, trend classification and insight text
//!
//! All functions here are pure: the current month is an explicit argument so
//! that identical inputs always give identical output.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{CropMarketView, MarketSnapshot, MarketTrend, PriceObservation};

/// Mean change above which a crop trends up (and below whose negation it trends down)
pub const TREND_THRESHOLD_PERCENT: Decimal = Decimal::TWO;

/// Best-market note only when the top price beats the lowest by more than this factor
pub fn best_market_spread() -> Decimal {
    Decimal::new(11, 1)
}

/// Seasonal note for crops whose name contains `crop_keyword` during
/// `start_month..=end_month`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeasonalRule {
    pub crop_keyword: String,
    pub start_month: u32,
    pub end_month: u32,
    pub note: String,
}

impl SeasonalRule {
    pub fn new(crop_keyword: &str, start_month: u32, end_month: u32, note: &str) -> Self {
        Self {
            crop_keyword: crop_keyword.to_string(),
            start_month,
            end_month,
            note: note.to_string(),
        }
    }

    /// Case-insensitive substring match on the crop name plus inclusive month range.
    /// A range whose start is after its end wraps over the new year (e.g. 11..=2).
    pub fn applies_to(&self, crop_name: &str, month: u32) -> bool {
        if !crop_name
            .to_lowercase()
            .contains(&self.crop_keyword.to_lowercase())
        {
            return false;
        }
        if self.start_month <= self.end_month {
            (self.start_month..=self.end_month).contains(&month)
        } else {
            month >= self.start_month || month <= self.end_month
        }
    }
}

/// Default seasonal table
pub fn default_seasonal_rules() -> Vec<SeasonalRule> {
    vec![
        SeasonalRule::new(
            "rice",
            10,
            12,
            "Harvest season - expect higher supply and potential price dips",
        ),
        SeasonalRule::new(
            "rice",
            4,
            6,
            "Pre-monsoon period - good demand for quality rice",
        ),
    ]
}

/// Reduce observations for one crop to the latest snapshot per market.
///
/// Markets keep the order in which they were first seen. Within a market the
/// most recent `observed_at` wins and ties go to the earlier observation.
pub fn aggregate_prices(observations: &[PriceObservation]) -> Vec<MarketSnapshot> {
    let mut snapshots: Vec<MarketSnapshot> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for obs in observations {
        match index.get(obs.market.as_str()) {
            Some(&i) => {
                if obs.observed_at > snapshots[i].observed_at {
                    snapshots[i] = MarketSnapshot::from(obs);
                }
            }
            None => {
                index.insert(obs.market.as_str(), snapshots.len());
                snapshots.push(MarketSnapshot::from(obs));
            }
        }
    }

    snapshots
}

/// Arithmetic mean of `change_percent` across snapshots.
///
/// `None` for an empty slice or when the sum overflows `Decimal`.
pub fn mean_change(snapshots: &[MarketSnapshot]) -> Option<Decimal> {
    if snapshots.is_empty() {
        return None;
    }
    let total = snapshots
        .iter()
        .try_fold(Decimal::ZERO, |acc, s| acc.checked_add(s.change_percent))?;
    total.checked_div(Decimal::from(snapshots.len()))
}

/// Classify the mean change with strict thresholds at +/-2%.
///
/// Callers must not pass an empty slice; in release builds it classifies as
/// stable, as does a change total too large to sum.
pub fn classify_trend(snapshots: &[MarketSnapshot]) -> MarketTrend {
    debug_assert!(!snapshots.is_empty(), "trend needs at least one market");
    mean_change(snapshots)
        .map(classify_mean_change)
        .unwrap_or(MarketTrend::Stable)
}

/// Trend for an already computed mean change
pub fn classify_mean_change(mean: Decimal) -> MarketTrend {
    if mean > TREND_THRESHOLD_PERCENT {
        MarketTrend::Up
    } else if mean < -TREND_THRESHOLD_PERCENT {
        MarketTrend::Down
    } else {
        MarketTrend::Stable
    }
}

/// Insight sentences for one crop, in order: trend, best market, seasonal notes
pub fn generate_market_insights(
    crop_name: &str,
    markets: &[MarketSnapshot],
    trend: MarketTrend,
    month: u32,
    rules: &[SeasonalRule],
) -> Vec<String> {
    let mut insights = vec![trend_sentence(crop_name, trend)];

    if let Some(note) = best_market_note(markets) {
        insights.push(note);
    }

    insights.extend(
        rules
            .iter()
            .filter(|rule| rule.applies_to(crop_name, month))
            .map(|rule| rule.note.clone()),
    );

    insights
}

fn trend_sentence(crop_name: &str, trend: MarketTrend) -> String {
    match trend {
        MarketTrend::Up => format!("{} prices are trending upward - good time to sell", crop_name),
        MarketTrend::Down => format!(
            "{} prices are declining - consider storage if possible",
            crop_name
        ),
        MarketTrend::Stable => format!("{} prices are stable", crop_name),
    }
}

/// "Best price at ..." when at least two markets differ by more than 10%
pub fn best_market_note(markets: &[MarketSnapshot]) -> Option<String> {
    if markets.len() < 2 {
        return None;
    }

    // Strict comparisons keep the first market on ties.
    let mut highest = &markets[0];
    let mut lowest = &markets[0];
    for m in &markets[1..] {
        if m.price > highest.price {
            highest = m;
        }
        if m.price < lowest.price {
            lowest = m;
        }
    }

    // No price can beat a threshold past Decimal::MAX
    let threshold = lowest.price.checked_mul(best_market_spread())?;
    if highest.price > threshold {
        Some(format!(
            "Best price at {} market (₹{}/{})",
            highest.market,
            highest.price.normalize(),
            highest.unit
        ))
    } else {
        None
    }
}

/// Full view for one crop, or `None` when there are no observations
pub fn compute_crop_market_view(
    crop_id: i32,
    crop_name: &str,
    observations: &[PriceObservation],
    month: u32,
    rules: &[SeasonalRule],
) -> Option<CropMarketView> {
    let markets = aggregate_prices(observations);
    if markets.is_empty() {
        return None;
    }

    let trend = classify_trend(&markets);
    let insights = generate_market_insights(crop_name, &markets, trend, month, rules);

    Some(CropMarketView {
        crop_id,
        crop_name: crop_name.to_string(),
        markets,
        trend,
        insights,
    })
}

/// Insights across all crops in view order, capped at `limit`
pub fn collect_insights(views: &[CropMarketView], limit: usize) -> Vec<String> {
    views
        .iter()
        .flat_map(|v| v.insights.iter().cloned())
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, hour, 0, 0).unwrap()
    }

    fn obs(market: &str, price: i64, change: i64, observed_at: DateTime<Utc>) -> PriceObservation {
        PriceObservation {
            market: market.to_string(),
            price: Decimal::from(price),
            unit: "kg".to_string(),
            change_percent: Decimal::from(change),
            observed_at,
        }
    }

    fn snap(market: &str, price: i64, change: i64) -> MarketSnapshot {
        MarketSnapshot::from(&obs(market, price, change, at(8)))
    }

    fn kerala_rice() -> Vec<MarketSnapshot> {
        vec![
            snap("Kochi", 32, 5),
            snap("Trivandrum", 30, 3),
            snap("Kozhikode", 34, 8),
        ]
    }

    #[test]
    fn test_aggregate_keeps_discovery_order_and_latest() {
        let observations = vec![
            obs("Kochi", 30, 1, at(6)),
            obs("Kozhikode", 33, 2, at(9)),
            obs("Kochi", 32, 5, at(10)),
            obs("Kozhikode", 31, -1, at(7)),
        ];

        let markets = aggregate_prices(&observations);
        assert_eq!(markets.len(), 2);
        assert_eq!(markets[0].market, "Kochi");
        assert_eq!(markets[0].price, Decimal::from(32));
        assert_eq!(markets[1].market, "Kozhikode");
        assert_eq!(markets[1].price, Decimal::from(33));
    }

    #[test]
    fn test_aggregate_tie_goes_to_first_observation() {
        let observations = vec![obs("Kochi", 30, 1, at(6)), obs("Kochi", 99, 1, at(6))];
        let markets = aggregate_prices(&observations);
        assert_eq!(markets.len(), 1);
        assert_eq!(markets[0].price, Decimal::from(30));
    }

    #[test]
    fn test_aggregate_empty() {
        assert!(aggregate_prices(&[]).is_empty());
        assert!(compute_crop_market_view(1, "Rice", &[], 5, &default_seasonal_rules()).is_none());
    }

    #[test]
    fn test_trend_thresholds() {
        assert_eq!(classify_trend(&[snap("A", 10, 3)]), MarketTrend::Up);
        assert_eq!(classify_trend(&[snap("A", 10, -3)]), MarketTrend::Down);
        assert_eq!(classify_trend(&[snap("A", 10, 0)]), MarketTrend::Stable);
        assert_eq!(classify_trend(&[snap("A", 10, 2)]), MarketTrend::Stable);
        assert_eq!(classify_trend(&[snap("A", 10, -2)]), MarketTrend::Stable);
        // mean of 1 and 4 is 2.5
        assert_eq!(
            classify_trend(&[snap("A", 10, 1), snap("B", 10, 4)]),
            MarketTrend::Up
        );
    }

    #[test]
    fn test_extreme_values_do_not_panic() {
        let huge = MarketSnapshot::from(&PriceObservation {
            market: "Kochi".to_string(),
            price: Decimal::MAX,
            unit: "kg".to_string(),
            change_percent: Decimal::MAX,
            observed_at: at(8),
        });
        let mut other = huge.clone();
        other.market = "Kannur".to_string();
        let markets = vec![huge, other];

        assert_eq!(mean_change(&markets), None);
        assert_eq!(classify_trend(&markets), MarketTrend::Stable);
        assert!(best_market_note(&markets).is_none());

        let mut cheap = markets.clone();
        cheap[1].price = Decimal::ONE;
        assert_eq!(
            best_market_note(&cheap).as_deref(),
            Some("Best price at Kochi market (₹79228162514264337593543950335/kg)")
        );
    }

    #[test]
    fn test_insights_for_kerala_rice() {
        let markets = kerala_rice();
        let trend = classify_trend(&markets);
        assert_eq!(trend, MarketTrend::Up);

        let insights =
            generate_market_insights("Rice", &markets, trend, 11, &default_seasonal_rules());
        assert_eq!(
            insights,
            vec![
                "Rice prices are trending upward - good time to sell".to_string(),
                "Best price at Kozhikode market (₹34/kg)".to_string(),
                "Harvest season - expect higher supply and potential price dips".to_string(),
            ]
        );
    }

    #[test]
    fn test_no_seasonal_note_outside_window() {
        let insights = generate_market_insights(
            "Rice",
            &kerala_rice(),
            MarketTrend::Up,
            8,
            &default_seasonal_rules(),
        );
        assert_eq!(insights.len(), 2);
    }

    #[test]
    fn test_best_market_requires_ten_percent_spread() {
        // 33 is exactly 30 * 1.1, not strictly greater
        let markets = vec![snap("Kochi", 30, 0), snap("Kannur", 33, 0)];
        assert!(best_market_note(&markets).is_none());

        let markets = vec![snap("Kochi", 30, 0), snap("Kannur", 34, 0)];
        assert_eq!(
            best_market_note(&markets).as_deref(),
            Some("Best price at Kannur market (₹34/kg)")
        );
    }

    #[test]
    fn test_best_market_tie_picks_first() {
        let markets = vec![
            snap("Kochi", 40, 0),
            snap("Palakkad", 20, 0),
            snap("Kannur", 40, 0),
        ];
        assert_eq!(
            best_market_note(&markets).as_deref(),
            Some("Best price at Kochi market (₹40/kg)")
        );
    }

    #[test]
    fn test_single_market_never_has_best_note() {
        let markets = vec![snap("Kochi", 32, 5)];
        let insights =
            generate_market_insights("Coconut", &markets, MarketTrend::Up, 1, &default_seasonal_rules());
        assert_eq!(insights.len(), 1);
        assert!(best_market_note(&markets).is_none());
    }

    #[test]
    fn test_seasonal_rule_matching() {
        let rule = SeasonalRule::new("RICE", 4, 6, "note");
        assert!(rule.applies_to("Basmati rice", 4));
        assert!(rule.applies_to("Rice", 6));
        assert!(!rule.applies_to("Rice", 7));
        assert!(!rule.applies_to("Ginger", 5));

        let wrapping = SeasonalRule::new("pepper", 11, 2, "winter");
        assert!(wrapping.applies_to("Black Pepper", 12));
        assert!(wrapping.applies_to("Black Pepper", 1));
        assert!(!wrapping.applies_to("Black Pepper", 3));
    }

    #[test]
    fn test_custom_rule_table() {
        let rules = vec![SeasonalRule::new("cardamom", 8, 9, "Auction season at Bodinayakanur")];
        let insights =
            generate_market_insights("Cardamom", &[snap("Kochi", 1200, 0)], MarketTrend::Stable, 8, &rules);
        assert_eq!(
            insights,
            vec![
                "Cardamom prices are stable".to_string(),
                "Auction season at Bodinayakanur".to_string(),
            ]
        );
    }

    #[test]
    fn test_collect_insights_caps() {
        let rules = default_seasonal_rules();
        let observations: Vec<PriceObservation> = vec![
            obs("Kochi", 32, 5, at(8)),
            obs("Kozhikode", 40, 8, at(8)),
        ];
        let rice = compute_crop_market_view(1, "Rice", &observations, 5, &rules).unwrap();
        let pepper = compute_crop_market_view(3, "Black Pepper", &observations, 5, &rules).unwrap();
        let views = vec![rice, pepper];

        let capped = collect_insights(&views, 4);
        assert_eq!(capped.len(), 4);
        assert_eq!(capped[2], "Pre-monsoon period - good demand for quality rice");
        assert_eq!(collect_insights(&views, 100).len(), 5);
    }

    proptest! {
        #[test]
        fn prop_one_snapshot_per_market(
            rows in prop::collection::vec((0usize..5, 1i64..500, -10i64..10, 0i64..1000), 0..40)
        ) {
            let names = ["Kochi", "Trivandrum", "Kozhikode", "Kannur", "Palakkad"];
            let base = at(0);
            let observations: Vec<PriceObservation> = rows
                .iter()
                .map(|(m, p, c, mins)| obs(names[*m], *p, *c, base + Duration::minutes(*mins)))
                .collect();

            let markets = aggregate_prices(&observations);
            let mut distinct: Vec<&str> = Vec::new();
            for o in &observations {
                if !distinct.contains(&o.market.as_str()) {
                    distinct.push(o.market.as_str());
                }
            }
            prop_assert_eq!(markets.len(), distinct.len());

            for (snapshot, name) in markets.iter().zip(distinct) {
                prop_assert_eq!(snapshot.market.as_str(), name);
                let latest = observations
                    .iter()
                    .filter(|o| o.market == name)
                    .map(|o| o.observed_at)
                    .max()
                    .unwrap();
                prop_assert_eq!(snapshot.observed_at, latest);
            }
        }

        #[test]
        fn prop_view_is_idempotent(
            rows in prop::collection::vec((0usize..3, 1i64..500, -10i64..10), 1..20),
            month in 1u32..=12
        ) {
            let names = ["Kochi", "Trivandrum", "Kozhikode"];
            let observations: Vec<PriceObservation> = rows
                .iter()
                .map(|(m, p, c)| obs(names[*m], *p, *c, at(8)))
                .collect();
            let rules = default_seasonal_rules();

            let first = compute_crop_market_view(7, "Rice", &observations, month, &rules);
            let second = compute_crop_market_view(7, "Rice", &observations, month, &rules);
            prop_assert_eq!(
                serde_json::to_string(&first).unwrap(),
                serde_json::to_string(&second).unwrap()
            );
            let view = first.unwrap();
            prop_assert!(!view.insights.is_empty() && view.insights.len() <= 3);
        }
    }
}
