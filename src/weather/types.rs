//! Open-Meteo API types
//!
//! Structs that mirror the geocoding and forecast JSON responses, plus the
//! snapshots handed back to agents and workflows.

use serde::{Deserialize, Serialize};

/// Response from the geocoding search endpoint
#[derive(Deserialize, Debug)]
pub struct GeocodingResponse {
    /// Matching places; the field is absent when nothing matched
    #[serde(default)]
    pub results: Option<Vec<GeocodingResult>>,
}

/// A single geocoding match
#[derive(Deserialize, Debug, Clone)]
pub struct GeocodingResult {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Resolved place name
    pub name: String,
}

/// Response from the forecast endpoint when requesting current conditions
#[derive(Deserialize, Debug)]
pub struct CurrentWeatherResponse {
    /// Current conditions
    pub current: CurrentWeather,
}

/// Current conditions block
#[derive(Deserialize, Debug)]
pub struct CurrentWeather {
    /// Observation time (ISO 8601, local to the location)
    #[allow(dead_code)] // Part of API response format
    pub time: String,
    /// Air temperature at 2m
    pub temperature_2m: f64,
    /// Apparent (feels-like) temperature
    pub apparent_temperature: f64,
    /// Relative humidity at 2m (percent)
    pub relative_humidity_2m: f64,
    /// Wind speed at 10m
    pub wind_speed_10m: f64,
    /// Wind gusts at 10m
    pub wind_gusts_10m: f64,
    /// WMO weather code
    pub weather_code: u16,
}

/// Response from the forecast endpoint when requesting the hourly outlook
#[derive(Deserialize, Debug)]
pub struct ForecastResponse {
    /// Current conditions (time and weather code only)
    pub current: ForecastCurrent,
    /// Hourly series
    pub hourly: HourlySeries,
}

/// Current block of the hourly forecast request
#[derive(Deserialize, Debug)]
pub struct ForecastCurrent {
    /// Observation time
    pub time: String,
    /// WMO weather code
    pub weather_code: u16,
}

/// Hourly series of the forecast request
#[derive(Deserialize, Debug)]
pub struct HourlySeries {
    /// Precipitation probability per hour (percent, may contain gaps)
    #[serde(default)]
    pub precipitation_probability: Vec<Option<f64>>,
    /// Temperature per hour (may contain gaps)
    #[serde(default)]
    pub temperature_2m: Vec<Option<f64>>,
}

/// Current weather for a resolved location
#[allow(missing_docs)]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub wind_gust: f64,
    pub conditions: String,
    pub location: String,
}

/// Daily outlook used for activity planning
#[allow(missing_docs)]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    pub date: String,
    pub max_temp: f64,
    pub min_temp: f64,
    pub precipitation_chance: f64,
    pub condition: String,
    pub location: String,
}
