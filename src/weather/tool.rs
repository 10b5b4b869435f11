//! The `get-weather` tool

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::agent::tool::{Tool, ToolError};
use crate::weather::WeatherClient;

/// Tool identifier shown to the model
pub const WEATHER_TOOL_ID: &str = "get-weather";

#[derive(Deserialize)]
struct WeatherToolInput {
    location: String,
}

/// Current weather lookup for a city name
pub struct WeatherTool {
    client: Arc<WeatherClient>,
}

impl WeatherTool {
    /// Create the tool on top of a weather client
    pub fn new(client: Arc<WeatherClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn id(&self) -> &str {
        WEATHER_TOOL_ID
    }

    fn description(&self) -> &str {
        "Get current weather for a location"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "location": { "type": "string", "description": "City name" }
            },
            "required": ["location"]
        })
    }

    fn output_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "temperature": { "type": "number" },
                "feelsLike": { "type": "number" },
                "humidity": { "type": "number" },
                "windSpeed": { "type": "number" },
                "windGust": { "type": "number" },
                "conditions": { "type": "string" },
                "location": { "type": "string" }
            },
            "required": ["temperature", "feelsLike", "humidity", "windSpeed", "windGust", "conditions", "location"]
        })
    }

    async fn execute(&self, input: Value) -> Result<Value, ToolError> {
        let input: WeatherToolInput =
            serde_json::from_value(input).map_err(|e| ToolError::InvalidInput(e.to_string()))?;

        let snapshot = self
            .client
            .current_weather(&input.location)
            .await
            .map_err(|e| ToolError::Failed(e.to_string()))?;

        serde_json::to_value(snapshot).map_err(|e| ToolError::Failed(e.to_string()))
    }
}
