//! Route definitions for the Krishi Sahayi API

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::{handlers, AppState};

/// Headroom for multipart framing around the image itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Create API routes
pub fn api_routes(max_image_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/weather", weather_routes())
        .nest("/crops", crop_routes())
        .nest("/market", market_routes())
        .nest("/disease", disease_routes(max_image_bytes))
        .nest("/soil", soil_routes())
        .nest("/tasks", task_routes())
        .nest("/chat", chat_routes())
        .nest("/users", user_routes())
}

/// Weather routes
fn weather_routes() -> Router<AppState> {
    Router::new()
        .route("/:location", get(handlers::get_weather_report))
        .route("/alerts/:location", get(handlers::get_weather_alerts))
        .route("/latest/:location", get(handlers::get_latest_weather))
}

/// Crop catalogue routes
fn crop_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_crops).post(handlers::create_crop))
        .route("/:crop_id", get(handlers::get_crop))
        .route(
            "/:crop_id/recommendations",
            post(handlers::get_crop_recommendations),
        )
}

/// Market price routes
fn market_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/prices",
            get(handlers::get_market_prices).post(handlers::record_market_price),
        )
        .route("/insights", get(handlers::get_market_insights))
        .route("/update", post(handlers::update_market_prices))
}

/// Disease detection routes
fn disease_routes(max_image_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/analyze",
            post(handlers::analyze_disease)
                .layer(DefaultBodyLimit::max(max_image_bytes + MULTIPART_OVERHEAD_BYTES)),
        )
        .route("/history/:user_id", get(handlers::get_disease_history))
}

/// Soil test routes
fn soil_routes() -> Router<AppState> {
    Router::new()
        .route("/test", post(handlers::create_soil_test))
        .route("/tests/:user_id", get(handlers::list_soil_tests))
        .route("/latest/:user_id", get(handlers::get_latest_soil_test))
}

/// Farming task routes
fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_task))
        // user id for listings, task id for completion
        .route("/:id", get(handlers::list_tasks))
        .route("/:id/upcoming", get(handlers::list_upcoming_tasks))
        .route("/:id/complete", patch(handlers::set_task_completion))
}

/// Assistant chat routes
fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::send_chat_message))
        .route("/history/:user_id", get(handlers::get_chat_history))
}

/// User routes
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_user))
        .route("/:user_id", get(handlers::get_user))
}
