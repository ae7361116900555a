//! Common types used across the platform

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Supported languages
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ml")]
    Malayalam,
    #[serde(rename = "ta")]
    Tamil,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Malayalam => "ml",
            Language::Tamil => "ta",
        }
    }
}

impl std::str::FromStr for Language {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::English),
            "ml" => Ok(Language::Malayalam),
            "ta" => Ok(Language::Tamil),
            _ => Err(ParseEnumError::new("language", s)),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Crop or place name in each supported language
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct LocalizedName {
    pub en: String,
    #[serde(default)]
    pub ml: Option<String>,
    #[serde(default)]
    pub ta: Option<String>,
}

impl LocalizedName {
    /// Name in the requested language, falling back to English
    pub fn get(&self, language: Language) -> &str {
        let local = match language {
            Language::English => None,
            Language::Malayalam => self.ml.as_deref(),
            Language::Tamil => self.ta.as_deref(),
        };
        local.unwrap_or(&self.en)
    }
}

/// Returned when a stored string does not name a known variant
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_codes() {
        assert_eq!("ml".parse::<Language>().unwrap(), Language::Malayalam);
        assert_eq!(" TA ".parse::<Language>().unwrap(), Language::Tamil);
        assert_eq!(Language::default().code(), "en");
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_localized_name_fallback() {
        let name = LocalizedName {
            en: "Rice".to_string(),
            ml: Some("നെല്ല്".to_string()),
            ta: None,
        };
        assert_eq!(name.get(Language::Malayalam), "നെല്ല്");
        assert_eq!(name.get(Language::Tamil), "Rice");
        assert_eq!(name.get(Language::English), "Rice");
    }
}
