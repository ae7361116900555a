//! Domain models for the Krishi Sahayi platform

mod advisory;
mod market;
mod soil;
mod task;
mod weather;

pub use advisory::*;
pub use market::*;
pub use soil::*;
pub use task::*;
pub use weather::*;
