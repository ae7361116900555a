//! Shared types and models for the Krishi Sahayi farming advisory platform
//!
//! This crate holds the domain models, the market and weather insight rules,
//! and field validation shared between the backend and the browser client
//! (via WASM).

pub mod insights;
pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
