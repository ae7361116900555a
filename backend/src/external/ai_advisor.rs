//! AI Advisor Client
//!
//! Client for an OpenAI-compatible chat completions API. Every call sends a
//! prompt built from structured context and expects a JSON object back.

use base64::Engine;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared::{ChatReply, CropRecommendation, DiseaseAnalysis, Language};

use crate::config::AiConfig;
use crate::error::{AppError, AppResult};

const ADVISOR_SYSTEM_PROMPT: &str = "You are an expert agricultural advisor specializing in Kerala farming practices. Respond only with valid JSON.";
const PATHOLOGIST_SYSTEM_PROMPT: &str = "You are an expert plant pathologist. Analyze the plant image for diseases and provide detailed diagnosis and treatment recommendations in JSON format.";
const SOIL_SYSTEM_PROMPT: &str = "You are a soil scientist and agricultural expert. Provide detailed soil analysis and recommendations in JSON format.";

/// Client for the AI completion service
#[derive(Clone)]
pub struct AiAdvisorClient {
    api_endpoint: String,
    api_key: String,
    model: String,
    http_client: Client,
}

/// Chat completion request
#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<Message>,
    response_format: ResponseFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: MessageContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Context attached to chat prompts
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatContext {
    pub recent_tasks: Vec<serde_json::Value>,
    pub soil_data: Option<serde_json::Value>,
    pub location: String,
}

impl AiAdvisorClient {
    /// Create a new AI advisor client
    pub fn new(api_endpoint: String, api_key: String, model: String, timeout_secs: u64) -> Self {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            api_endpoint: api_endpoint.trim_end_matches('/').to_string(),
            api_key,
            model,
            http_client,
        }
    }

    /// Create a client from configuration, if an API key is present
    pub fn from_config(config: &AiConfig) -> Option<Self> {
        let api_key = config.api_key.clone().filter(|k| !k.is_empty())?;
        Some(Self::new(
            config.api_endpoint.clone(),
            api_key,
            config.model.clone(),
            config.timeout_secs,
        ))
    }

    /// Send one completion and return the raw message content
    async fn complete(
        &self,
        system: &str,
        user: MessageContent,
        max_completion_tokens: Option<u32>,
    ) -> AppResult<Option<String>> {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system",
                    content: MessageContent::Text(system.to_string()),
                },
                Message {
                    role: "user",
                    content: user,
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
            max_completion_tokens,
        };

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.api_endpoint))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::AiServiceError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::AiServiceError(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let result: CompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::AiServiceError(format!("Failed to parse response: {}", e)))?;

        Ok(result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty()))
    }

    async fn complete_json<T: DeserializeOwned>(
        &self,
        system: &str,
        user: MessageContent,
        max_completion_tokens: Option<u32>,
        empty: &str,
    ) -> AppResult<T> {
        let content = self
            .complete(system, user, max_completion_tokens)
            .await?
            .unwrap_or_else(|| empty.to_string());
        parse_json(&content)
    }

    /// Crop-specific recommendations for current weather and soil
    pub async fn crop_recommendations(
        &self,
        crop: &str,
        location: &str,
        weather: Option<&serde_json::Value>,
        soil: Option<&serde_json::Value>,
        language: Language,
    ) -> AppResult<CropRecommendation> {
        let prompt = crop_prompt(crop, location, weather, soil, language);
        self.complete_json(
            ADVISOR_SYSTEM_PROMPT,
            MessageContent::Text(prompt),
            None,
            "{}",
        )
        .await
    }

    /// Diagnose plant disease from an image
    pub async fn analyze_plant_disease(&self, image: &[u8]) -> AppResult<DiseaseAnalysis> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(image);
        let content = MessageContent::Parts(vec![
            ContentPart::Text {
                text: DISEASE_PROMPT.to_string(),
            },
            ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: format!("data:image/jpeg;base64,{}", encoded),
                },
            },
        ]);

        self.complete_json(
            PATHOLOGIST_SYSTEM_PROMPT,
            content,
            Some(2048),
            r#"{"disease": "unknown"}"#,
        )
        .await
    }

    /// Assistant reply to a farmer's message
    pub async fn chat_response(
        &self,
        message: &str,
        context: &ChatContext,
        language: Language,
    ) -> AppResult<ChatReply> {
        let system = chat_system_prompt(context, language);
        let content = self
            .complete(&system, MessageContent::Text(message.to_string()), None)
            .await?;

        match content {
            Some(content) => parse_json(&content),
            None => Ok(ChatReply::fallback()),
        }
    }

    /// Recommendations for a soil test, passed through as JSON
    pub async fn soil_recommendations(
        &self,
        soil_test: &serde_json::Value,
        crop: Option<&str>,
    ) -> AppResult<serde_json::Value> {
        let prompt = soil_prompt(soil_test, crop);
        self.complete_json(SOIL_SYSTEM_PROMPT, MessageContent::Text(prompt), None, "{}")
            .await
    }
}

fn parse_json<T: DeserializeOwned>(content: &str) -> AppResult<T> {
    serde_json::from_str(content)
        .map_err(|e| AppError::AiServiceError(format!("Invalid JSON from advisor: {}", e)))
}

fn describe(value: Option<&serde_json::Value>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "Not available".to_string())
}

fn crop_prompt(
    crop: &str,
    location: &str,
    weather: Option<&serde_json::Value>,
    soil: Option<&serde_json::Value>,
    language: Language,
) -> String {
    format!(
        "You are an expert agricultural advisor for Kerala, India. Provide specific farming recommendations for {crop} in {location}.

Current conditions:
- Weather: {weather}
- Soil data: {soil}
- Language: {language}

Provide recommendations in JSON format with:
- crop: crop name
- recommendations: array of specific actionable advice
- tasks: array of tasks with title, description, priority (low/medium/high), and dueDate (YYYY-MM-DD)
- warnings: array of potential issues to watch for

Focus on Kerala-specific farming practices and current conditions.",
        weather = describe(weather),
        soil = describe(soil),
        language = language.code(),
    )
}

const DISEASE_PROMPT: &str = "Analyze this plant image for diseases. Provide response in JSON format with:
- disease: disease name or \"healthy\" if no disease detected
- confidence: confidence score (0-100)
- severity: \"low\", \"medium\", or \"high\"
- treatment: array of treatment steps
- prevention: array of prevention measures

Focus on diseases common in Kerala's tropical climate.";

fn chat_system_prompt(context: &ChatContext, language: Language) -> String {
    let context_json = serde_json::to_string(context).unwrap_or_else(|_| "{}".to_string());
    format!(
        "You are Krishi Sahayi, an AI farming assistant specifically designed for Kerala farmers. You have expertise in:
- Kerala's tropical agriculture and monsoon patterns
- Local crops: rice, coconut, pepper, banana, rubber, spices
- Traditional and modern farming practices
- Pest and disease management
- Market trends and pricing
- Government schemes and subsidies

Context: {context_json}
Language: {language}

Reply as a JSON object with \"response\" and optional \"actionItems\". Provide helpful, practical advice in a friendly manner. If speaking in Malayalam or Tamil, use the script appropriately.",
        language = language.code(),
    )
}

fn soil_prompt(soil_test: &serde_json::Value, crop: Option<&str>) -> String {
    format!(
        "Analyze this soil test data and provide recommendations for {crop} in Kerala:

Soil Data: {soil_test}

Provide response in JSON format with:
- overallHealth: \"poor\", \"fair\", \"good\", \"excellent\"
- criticalIssues: array of urgent problems
- recommendations: array of specific actions
- fertilizers: array of recommended fertilizers with quantities
- timeline: when to implement recommendations",
        crop = crop.unwrap_or("general farming"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_crop_prompt_mentions_context() {
        let weather = json!({"temperature": 31, "condition": "Rain"});
        let prompt = crop_prompt("Rice", "Alappuzha", Some(&weather), None, Language::Malayalam);
        assert!(prompt.contains("recommendations for Rice in Alappuzha"));
        assert!(prompt.contains("\"condition\":\"Rain\""));
        assert!(prompt.contains("Soil data: Not available"));
        assert!(prompt.contains("Language: ml"));
    }

    #[test]
    fn test_soil_prompt_defaults_crop() {
        let prompt = soil_prompt(&json!({"ph": "5.2"}), None);
        assert!(prompt.contains("recommendations for general farming in Kerala"));
    }

    #[test]
    fn test_chat_prompt_embeds_context() {
        let context = ChatContext {
            recent_tasks: vec![],
            soil_data: None,
            location: "Thrissur".to_string(),
        };
        let prompt = chat_system_prompt(&context, Language::Tamil);
        assert!(prompt.contains("\"location\":\"Thrissur\""));
        assert!(prompt.contains("Language: ta"));
    }

    #[test]
    fn test_image_request_serialization() {
        let content = MessageContent::Parts(vec![
            ContentPart::Text {
                text: "look".to_string(),
            },
            ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: "data:image/jpeg;base64,AAAA".to_string(),
                },
            },
        ]);
        let value = serde_json::to_value(&content).unwrap();
        assert_eq!(value[0]["type"], "text");
        assert_eq!(value[1]["type"], "image_url");
        assert_eq!(value[1]["image_url"]["url"], "data:image/jpeg;base64,AAAA");
    }

    #[test]
    fn test_parse_json_reports_bad_payload() {
        let result: AppResult<DiseaseAnalysis> = parse_json("not json");
        assert!(matches!(result, Err(AppError::AiServiceError(_))));
    }

    #[test]
    fn test_client_requires_api_key() {
        let config = AiConfig {
            api_endpoint: "https://api.openai.com/v1".to_string(),
            api_key: Some(String::new()),
            model: "gpt-5".to_string(),
            timeout_secs: 5,
        };
        assert!(AiAdvisorClient::from_config(&config).is_none());
    }
}
