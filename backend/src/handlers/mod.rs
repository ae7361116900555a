//! HTTP request handlers

pub mod chat;
pub mod crop;
pub mod disease;
pub mod health;
pub mod market;
pub mod soil;
pub mod task;
pub mod user;
pub mod weather;

pub use chat::*;
pub use crop::*;
pub use disease::*;
pub use health::*;
pub use market::*;
pub use soil::*;
pub use task::*;
pub use user::*;
pub use weather::*;
