//! Weather advice integration tests
//!
//! Tests for farming tips and alerts including:
//! - Threshold rules for heat, humidity, wind and rain
//! - Empty alert lists when conditions are calm
//! - Unit handling between the provider (m/s) and the client (km/h)

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::insights::{advise, generate_farming_advice, generate_weather_alerts};
use shared::{kph_to_mps, mps_to_kph, DailyForecast, WeatherSnapshot};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn day(offset: u32, condition: &str) -> DailyForecast {
    DailyForecast {
        date: NaiveDate::from_ymd_opt(2024, 6, 1 + offset).unwrap(),
        high: 31,
        low: 24,
        condition: condition.to_string(),
        icon: String::new(),
    }
}

fn snapshot(temp: i64, humidity: i32, wind_mps: &str, forecast: Vec<DailyForecast>) -> WeatherSnapshot {
    WeatherSnapshot {
        location: "Kochi".to_string(),
        temperature_celsius: Decimal::from(temp),
        condition: "Clear".to_string(),
        humidity_percent: humidity,
        wind_speed_mps: dec(wind_mps),
        forecast,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Hot dry afternoon in Palakkad: heat tips, spraying allowed, no fungal or rain tips
    #[test]
    fn test_heat_advice() {
        let advice = generate_farming_advice(&snapshot(40, 60, "2", vec![]));
        assert!(advice.contains(&"Very hot day - increase irrigation frequency".to_string()));
        assert!(advice
            .contains(&"Calm weather - good for spraying pesticides/fertilizers".to_string()));
        assert!(advice.iter().all(|a| !a.contains("fungal")));
        assert!(advice.iter().all(|a| !a.starts_with("Rain expected")));
    }

    #[test]
    fn test_monsoon_advice_order() {
        let advice = generate_farming_advice(&snapshot(
            27,
            88,
            "6.5",
            vec![day(0, "Clouds"), day(1, "Thunderstorm")],
        ));
        assert_eq!(
            advice,
            vec![
                "Optimal temperature for most field activities",
                "High humidity - monitor for fungal diseases",
                "Ensure good air circulation in crops",
                "Windy conditions - avoid spraying operations",
                "Rain expected - postpone irrigation",
                "Ensure proper drainage in fields",
            ]
        );
    }

    #[test]
    fn test_extreme_heat_alert_only() {
        let alerts = generate_weather_alerts(&snapshot(39, 60, "1", vec![]));
        assert_eq!(
            alerts,
            vec!["Extreme heat warning - protect crops and livestock".to_string()]
        );
    }

    #[test]
    fn test_disease_risk_alert() {
        let alerts = generate_weather_alerts(&snapshot(32, 90, "1", vec![]));
        assert!(alerts
            .contains(&"High humidity and temperature - disease risk increased".to_string()));
    }

    #[test]
    fn test_calm_weather_has_no_alerts() {
        let alerts = generate_weather_alerts(&snapshot(
            25,
            40,
            "1",
            vec![day(0, "Clear"), day(1, "Clouds"), day(2, "Haze")],
        ));
        assert!(alerts.is_empty());
    }

    /// Storms suggest drainage work but only rain raises the rainfall alert
    #[test]
    fn test_storm_is_advice_not_alert() {
        let weather = snapshot(29, 70, "3", vec![day(0, "Thunderstorm")]);
        let bundle = advise(&weather);
        assert!(bundle.tips.contains(&"Ensure proper drainage in fields".to_string()));
        assert!(bundle.alerts.is_empty());
    }

    #[test]
    fn test_wind_threshold_is_metres_per_second() {
        // 5 m/s is 18 km/h; the threshold applies to the provider unit
        let at_limit = generate_farming_advice(&snapshot(28, 70, "5", vec![]));
        assert!(at_limit.iter().any(|a| a.starts_with("Calm weather")));
        assert_eq!(mps_to_kph(dec("5")), dec("18"));

        let gusty = generate_farming_advice(&snapshot(28, 70, "5.01", vec![]));
        assert!(gusty.iter().any(|a| a.starts_with("Windy conditions")));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn condition_strategy() -> impl Strategy<Value = String> {
        prop::sample::select(vec![
            "Clear",
            "Clouds",
            "Rain",
            "Drizzle",
            "Thunderstorm",
            "Mist",
            "light rain",
        ])
        .prop_map(|c| c.to_string())
    }

    fn snapshot_strategy() -> impl Strategy<Value = WeatherSnapshot> {
        (
            10i64..45i64,
            20i32..100i32,
            0i64..1500i64,
            prop::collection::vec(condition_strategy(), 0..5),
        )
            .prop_map(|(temp, humidity, wind_cms, conditions)| WeatherSnapshot {
                location: "Thrissur".to_string(),
                temperature_celsius: Decimal::from(temp),
                condition: "Clear".to_string(),
                humidity_percent: humidity,
                wind_speed_mps: Decimal::new(wind_cms, 2),
                forecast: conditions
                    .iter()
                    .enumerate()
                    .map(|(i, c)| day(i as u32, c))
                    .collect(),
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Exactly one temperature tip group and one wind tip always fire
        #[test]
        fn prop_advice_always_covers_temperature_and_wind(weather in snapshot_strategy()) {
            let advice = generate_farming_advice(&weather);
            let wind_tips = advice
                .iter()
                .filter(|a| a.starts_with("Windy conditions") || a.starts_with("Calm weather"))
                .count();
            prop_assert_eq!(wind_tips, 1);
            prop_assert!(advice.len() >= 2 && advice.len() <= 7);
        }

        /// Rain alert fires exactly when a forecast day mentions rain
        #[test]
        fn prop_rain_alert_matches_forecast(weather in snapshot_strategy()) {
            let alerts = generate_weather_alerts(&weather);
            let rainy = weather
                .forecast
                .iter()
                .any(|d| d.condition.to_lowercase().contains("rain"));
            let alerted = alerts.iter().any(|a| a.starts_with("Heavy rainfall"));
            prop_assert_eq!(rainy, alerted);
        }

        /// Advice and alerts are repeatable for the same snapshot
        #[test]
        fn prop_advice_is_deterministic(weather in snapshot_strategy()) {
            prop_assert_eq!(advise(&weather), advise(&weather));
        }

        /// Whole km/h values survive the round trip through m/s
        #[test]
        fn prop_kph_round_trip(kph in 0i64..200i64) {
            let kph = Decimal::from(kph);
            prop_assert_eq!(mps_to_kph(kph_to_mps(kph)), kph);
        }
    }
}
