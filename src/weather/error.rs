//! Weather lookup errors

use thiserror::Error;

/// Errors that can occur while looking up weather data
#[derive(Error, Debug)]
pub enum WeatherError {
    /// The geocoding search returned no match
    #[error("Location '{0}' not found")]
    LocationNotFound(String),

    /// The API answered with a non-success status
    #[error("Failed to fetch data from {0}")]
    Fetch(String),

    /// The request could not be sent (DNS, connection, timeout)
    #[error("Failed to fetch data from {0}: {1}")]
    Request(String, #[source] reqwest::Error),

    /// The response body was not the expected JSON
    #[error("Invalid response from {0}: {1}")]
    Decode(String, #[source] reqwest::Error),

    /// The response was valid JSON but lacked required values
    #[error("Incomplete weather data: {0}")]
    MissingData(String),

    /// A request URL could not be built from the configured base URL
    #[error("Invalid weather API URL: {0}")]
    InvalidUrl(String),
}
