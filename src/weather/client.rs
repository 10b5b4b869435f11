//! Open-Meteo client
//!
//! Resolves a place name to coordinates through the geocoding API, then asks the
//! forecast API for conditions at those coordinates. No retries, no caching.

use crate::config::WeatherConfig;
use crate::weather::conditions::weather_condition;
use crate::weather::error::WeatherError;
use crate::weather::types::{
    CurrentWeatherResponse, DailyForecast, ForecastResponse, GeocodingResponse, GeocodingResult,
    WeatherSnapshot,
};
use reqwest::Url;
use serde::de::DeserializeOwned;

const CURRENT_FIELDS: &str = "temperature_2m,apparent_temperature,relative_humidity_2m,wind_speed_10m,wind_gusts_10m,weather_code";
const FORECAST_CURRENT_FIELDS: &str = "temperature_2m,precipitation,weather_code";
const FORECAST_HOURLY_FIELDS: &str = "precipitation_probability,temperature_2m";

/// Client for the geocoding and forecast APIs
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: reqwest::Client,
    geocoding_base_url: String,
    forecast_base_url: String,
}

impl WeatherClient {
    /// Create a client using the configured base URLs
    pub fn new(client: reqwest::Client, config: &WeatherConfig) -> Self {
        Self::with_base_urls(
            client,
            &config.geocoding_base_url,
            &config.forecast_base_url,
        )
    }

    /// Create a client against explicit base URLs (used by tests)
    pub fn with_base_urls(
        client: reqwest::Client,
        geocoding_base_url: &str,
        forecast_base_url: &str,
    ) -> Self {
        Self {
            client,
            geocoding_base_url: geocoding_base_url.trim_end_matches('/').to_string(),
            forecast_base_url: forecast_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolve a place name to its best geocoding match
    ///
    /// # Errors
    /// * `WeatherError::LocationNotFound` if the search returned no result
    /// * `WeatherError::Fetch` if the API answered with a non-success status
    pub async fn geocode(&self, location: &str) -> Result<GeocodingResult, WeatherError> {
        let url = build_url(
            &format!("{}/search", self.geocoding_base_url),
            &[("name", location), ("count", "1")],
        )?;

        let response: GeocodingResponse = self.fetch_json(url).await?;
        response
            .results
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| WeatherError::LocationNotFound(location.to_string()))
    }

    /// Get current conditions for a place name
    pub async fn current_weather(&self, location: &str) -> Result<WeatherSnapshot, WeatherError> {
        let place = self.geocode(location).await?;
        let latitude = place.latitude.to_string();
        let longitude = place.longitude.to_string();
        let url = build_url(
            &format!("{}/forecast", self.forecast_base_url),
            &[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current", CURRENT_FIELDS),
            ],
        )?;

        let data: CurrentWeatherResponse = self.fetch_json(url).await?;
        let current = data.current;

        Ok(WeatherSnapshot {
            temperature: current.temperature_2m,
            feels_like: current.apparent_temperature,
            humidity: current.relative_humidity_2m,
            wind_speed: current.wind_speed_10m,
            wind_gust: current.wind_gusts_10m,
            conditions: weather_condition(current.weather_code).to_string(),
            location: place.name,
        })
    }

    /// Get today's outlook (temperature range, peak precipitation chance) for a city
    pub async fn daily_forecast(&self, city: &str) -> Result<DailyForecast, WeatherError> {
        let place = self.geocode(city).await?;
        let latitude = place.latitude.to_string();
        let longitude = place.longitude.to_string();
        let url = build_url(
            &format!("{}/forecast", self.forecast_base_url),
            &[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current", FORECAST_CURRENT_FIELDS),
                ("hourly", FORECAST_HOURLY_FIELDS),
                ("forecast_days", "1"),
                ("timezone", "auto"),
            ],
        )?;

        let data: ForecastResponse = self.fetch_json(url).await?;
        let temperatures: Vec<f64> = data.hourly.temperature_2m.iter().flatten().copied().collect();
        if temperatures.is_empty() {
            return Err(WeatherError::MissingData(format!(
                "no hourly temperatures for '{}'",
                place.name
            )));
        }

        let max_temp = temperatures.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min_temp = temperatures.iter().copied().fold(f64::INFINITY, f64::min);
        let precipitation_chance = data
            .hourly
            .precipitation_probability
            .iter()
            .flatten()
            .copied()
            .fold(0.0, f64::max);

        Ok(DailyForecast {
            date: data.current.time,
            max_temp,
            min_temp,
            precipitation_chance,
            condition: weather_condition(data.current.weather_code).to_string(),
            location: place.name,
        })
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, WeatherError> {
        tracing::debug!(url = %url, "Fetching weather data");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| WeatherError::Request(url.to_string(), e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(
                url = %url,
                status_code = status.as_u16(),
                "Weather API returned error status"
            );
            return Err(WeatherError::Fetch(url.to_string()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| WeatherError::Decode(url.to_string(), e))
    }
}

fn build_url(base: &str, params: &[(&str, &str)]) -> Result<Url, WeatherError> {
    Url::parse_with_params(base, params)
        .map_err(|e| WeatherError::InvalidUrl(format!("{}: {}", base, e)))
}
