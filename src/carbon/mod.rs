pub mod config;
pub mod model;

pub use config::CarbonConfig;
pub use model::{CarbonModel, EcoRating};
