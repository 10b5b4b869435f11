//! Weather lookups
//!
//! Geocoding plus current conditions and daily outlook from Open-Meteo, and the
//! `get-weather` tool agents use.

pub mod client;
pub mod conditions;
pub mod error;
pub mod tool;
pub mod types;

pub use client::WeatherClient;
pub use conditions::weather_condition;
pub use error::WeatherError;
pub use tool::WeatherTool;
pub use types::{DailyForecast, WeatherSnapshot};
