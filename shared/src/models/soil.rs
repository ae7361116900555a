//! Soil health models

use serde::{Deserialize, Serialize};

use crate::types::ParseEnumError;

/// Nutrient level reported by a soil test kit
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NutrientLevel {
    Low,
    Medium,
    High,
}

impl NutrientLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NutrientLevel::Low => "low",
            NutrientLevel::Medium => "medium",
            NutrientLevel::High => "high",
        }
    }
}

impl std::str::FromStr for NutrientLevel {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(NutrientLevel::Low),
            "medium" => Ok(NutrientLevel::Medium),
            "high" => Ok(NutrientLevel::High),
            _ => Err(ParseEnumError::new("nutrient level", s)),
        }
    }
}

/// Overall soil health grade returned by the advisor
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SoilHealth {
    Poor,
    Fair,
    Good,
    Excellent,
}

/// Soil recommendations returned by the advisor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoilRecommendations {
    #[serde(default)]
    pub overall_health: Option<SoilHealth>,
    #[serde(default)]
    pub critical_issues: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    /// Free-form fertilizer entries, usually name plus quantity
    #[serde(default)]
    pub fertilizers: Vec<serde_json::Value>,
    #[serde(default)]
    pub timeline: Option<serde_json::Value>,
}
