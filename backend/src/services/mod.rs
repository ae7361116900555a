//! Business logic services for the Krishi Sahayi platform

pub mod chat;
pub mod crop;
pub mod disease;
pub mod market;
pub mod soil;
pub mod task;
pub mod user;
pub mod weather;

pub use chat::ChatService;
pub use crop::CropService;
pub use disease::DiseaseService;
pub use market::MarketService;
pub use soil::SoilService;
pub use task::TaskService;
pub use user::UserService;
pub use weather::WeatherService;
