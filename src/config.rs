//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;
use std::time::Duration;

/// Default Gemini model used by the agents
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Default Gemini API base URL
pub const DEFAULT_GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default Open-Meteo geocoding API base URL
pub const DEFAULT_GEOCODING_API_BASE_URL: &str = "https://geocoding-api.open-meteo.com/v1";

/// Default Open-Meteo forecast API base URL
pub const DEFAULT_FORECAST_API_BASE_URL: &str = "https://api.open-meteo.com/v1";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Language model configuration
    pub llm: LlmConfig,
    /// Weather provider configuration
    pub weather: WeatherConfig,
    /// Execution configuration
    pub execution: ExecutionConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Language model configuration
#[derive(Clone)]
pub struct LlmConfig {
    /// Gemini API key (agents fail at call time when missing)
    pub api_key: Option<String>,
    /// Gemini model name
    pub model: String,
    /// Gemini API base URL
    pub api_base_url: String,
}

// Keeps the API key out of the startup log.
impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

/// Weather provider configuration
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    /// Geocoding API base URL
    pub geocoding_base_url: String,
    /// Forecast API base URL
    pub forecast_base_url: String,
}

/// Execution configuration
#[derive(Debug, Clone)]
pub struct ExecutionConfig {
    /// Timeout for outbound HTTP requests (in seconds)
    pub http_timeout_secs: u64,
    /// Timeout for a whole workflow run (in seconds)
    pub workflow_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                port: 3000,
                host: "0.0.0.0".to_string(),
            },
            llm: LlmConfig {
                api_key: None,
                model: DEFAULT_GEMINI_MODEL.to_string(),
                api_base_url: DEFAULT_GEMINI_API_BASE_URL.to_string(),
            },
            weather: WeatherConfig {
                geocoding_base_url: DEFAULT_GEOCODING_API_BASE_URL.to_string(),
                forecast_base_url: DEFAULT_FORECAST_API_BASE_URL.to_string(),
            },
            execution: ExecutionConfig {
                http_timeout_secs: 30,
                workflow_timeout_secs: 300,
            },
        }
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server: ServerConfig {
                port: parse_var("PORT").unwrap_or(defaults.server.port),
                host: env::var("HOST").unwrap_or(defaults.server.host),
            },
            llm: LlmConfig {
                api_key: env::var("GEMINI_API_KEY")
                    .ok()
                    .filter(|key| !key.trim().is_empty()),
                model: env::var("GEMINI_MODEL").unwrap_or(defaults.llm.model),
                api_base_url: env::var("GEMINI_API_BASE_URL")
                    .unwrap_or(defaults.llm.api_base_url),
            },
            weather: WeatherConfig {
                geocoding_base_url: env::var("GEOCODING_API_BASE_URL")
                    .unwrap_or(defaults.weather.geocoding_base_url),
                forecast_base_url: env::var("FORECAST_API_BASE_URL")
                    .unwrap_or(defaults.weather.forecast_base_url),
            },
            execution: ExecutionConfig {
                http_timeout_secs: parse_var("HTTP_TIMEOUT_SECS")
                    .unwrap_or(defaults.execution.http_timeout_secs),
                workflow_timeout_secs: parse_var("WORKFLOW_TIMEOUT_SECS")
                    .unwrap_or(defaults.execution.workflow_timeout_secs),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Build the shared outbound HTTP client (connection pooling)
    pub fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(self.execution.http_timeout_secs))
            .build()
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|value| value.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_port_is_3000() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server_addr(), "0.0.0.0:3000");
    }

    #[test]
    #[serial]
    fn test_from_env_overrides_and_ignores_garbage() {
        env::set_var("PORT", "8081");
        env::set_var("GEMINI_API_KEY", "   ");
        env::set_var("WORKFLOW_TIMEOUT_SECS", "not-a-number");

        let config = Config::from_env();

        env::remove_var("PORT");
        env::remove_var("GEMINI_API_KEY");
        env::remove_var("WORKFLOW_TIMEOUT_SECS");

        assert_eq!(config.server.port, 8081);
        assert!(config.llm.api_key.is_none());
        assert_eq!(config.execution.workflow_timeout_secs, 300);
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        env::remove_var("PORT");
        env::remove_var("GEOCODING_API_BASE_URL");

        let config = Config::from_env();

        assert_eq!(config.server.port, 3000);
        assert_eq!(
            config.weather.geocoding_base_url,
            DEFAULT_GEOCODING_API_BASE_URL
        );
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let mut config = Config::default();
        config.llm.api_key = Some("secret-key".to_string());
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("<redacted>"));
    }
}
