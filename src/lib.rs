//! smogcheck
//!
//! Looks up current PM2.5 for a city via OpenWeather and restates it as
//! cigarettes smoked per day, alongside the EPA AQI classification.
//!
//! - `converter`, `aqi`: pure conversions (always built)
//! - `types`, `error`, `report`: data model shared by both layers
//! - `upstream`, `cache`, `config`, `api_server`: the HTTP service
//!   (feature `api`, on by default)

pub mod aqi;
pub mod converter;
pub mod error;
pub mod report;
pub mod types;

#[cfg(feature = "api")]
pub mod api_server;
#[cfg(feature = "api")]
pub mod cache;
#[cfg(feature = "api")]
pub mod config;
#[cfg(feature = "api")]
pub mod upstream;

// Re-export commonly used types
pub use aqi::{pm25_to_aqi, AqiAssessment, SeverityCategory, UNDEFINED_AQI};
pub use converter::{pm25_to_cigarettes, CigaretteBurden};
pub use error::SmogError;
pub use report::AirReport;
pub use types::{Coordinates, PollutionReading};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
#[cfg(feature = "api")]
pub use config::AppConfig;
