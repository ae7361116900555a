//! Clients for external services

pub mod ai_advisor;
pub mod weather;

pub use ai_advisor::AiAdvisorClient;
pub use weather::WeatherClient;
