//! Advisor responses for crop planning, disease diagnosis and chat

use serde::{Deserialize, Serialize};

use super::task::SuggestedTask;

/// Crop-specific recommendations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropRecommendation {
    #[serde(default)]
    pub crop: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub tasks: Vec<SuggestedTask>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Disease severity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DiseaseSeverity {
    #[default]
    Low,
    Medium,
    High,
}

/// Plant disease diagnosis from an image
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseAnalysis {
    /// Disease name, or "healthy"
    pub disease: String,
    /// Confidence from 0 to 100
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub severity: DiseaseSeverity,
    #[serde(default)]
    pub treatment: Vec<String>,
    #[serde(default)]
    pub prevention: Vec<String>,
}

impl DiseaseAnalysis {
    pub fn is_healthy(&self) -> bool {
        self.disease.eq_ignore_ascii_case("healthy")
    }
}

/// Reply from the farming assistant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_items: Option<Vec<String>>,
}

impl ChatReply {
    pub const FALLBACK: &'static str =
        "I apologize, but I could not process your request at the moment.";

    pub fn fallback() -> Self {
        Self {
            response: Self::FALLBACK.to_string(),
            action_items: None,
        }
    }
}
