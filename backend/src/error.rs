//! Error handling for the Krishi Sahayi platform
//!
//! Every error leaves the server as `{"error": {"code", "message", "field"?}}`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // External service errors
    #[error("Weather service unavailable: {0}")]
    WeatherServiceUnavailable(String),

    #[error("AI service not configured")]
    AiServiceUnavailable,

    #[error("AI service error: {0}")]
    AiServiceError(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    /// Validation failure on a single field
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateEntry(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::WeatherServiceUnavailable(_) | AppError::AiServiceUnavailable => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::AiServiceError(_) => StatusCode::BAD_GATEWAY,
            AppError::DatabaseError(_) | AppError::Internal(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        match field_errors.iter().next() {
            Some((field, errs)) => {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                AppError::invalid(field, message)
            }
            None => AppError::ValidationError(errors.to_string()),
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    fn detail(&self) -> ErrorDetail {
        let (code, message, field) = match self {
            AppError::Validation { field, message } => {
                ("VALIDATION_ERROR", message.clone(), Some(field.clone()))
            }
            AppError::ValidationError(msg) => ("VALIDATION_ERROR", msg.clone(), None),
            AppError::DuplicateEntry(field) => (
                "DUPLICATE_ENTRY",
                format!("A record with this {} already exists", field),
                Some(field.clone()),
            ),
            AppError::NotFound(resource) => {
                ("NOT_FOUND", format!("{} not found", resource), None)
            }
            AppError::WeatherServiceUnavailable(_) => (
                "WEATHER_SERVICE_UNAVAILABLE",
                "Weather service is temporarily unavailable".to_string(),
                None,
            ),
            AppError::AiServiceUnavailable => (
                "AI_SERVICE_UNAVAILABLE",
                "The farming advisor is not available right now".to_string(),
                None,
            ),
            AppError::AiServiceError(msg) => {
                ("AI_SERVICE_ERROR", format!("AI service error: {}", msg), None)
            }
            AppError::DatabaseError(_) => {
                ("DATABASE_ERROR", "A database error occurred".to_string(), None)
            }
            AppError::Internal(msg) => ("INTERNAL_ERROR", msg.clone(), None),
            AppError::InternalError(_) => (
                "INTERNAL_ERROR",
                "An internal server error occurred".to_string(),
                None,
            ),
        };

        ErrorDetail {
            code: code.to_string(),
            message,
            field,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Log the error for debugging
        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        (status, Json(ErrorResponse { error: self.detail() })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
