//! Shared helpers for integration tests
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{json, Value};
use tower::ServiceExt;
use weather_agent_server::config::Config;
use weather_agent_server::llm::{
    ContentPart, LanguageModel, LlmError, ModelRequest, ModelResponse,
};
use weather_agent_server::registry::Registry;
use weather_agent_server::server::build_router;
use weather_agent_server::state::AppState;

/// Language model that replays canned turns and records requests
pub struct ScriptedModel {
    responses: Mutex<VecDeque<Result<ModelResponse, LlmError>>>,
    pub requests: Mutex<Vec<ModelRequest>>,
}

impl ScriptedModel {
    pub fn new(responses: Vec<Result<ModelResponse, LlmError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    fn model_id(&self) -> &str {
        "scripted-model"
    }

    fn provider(&self) -> &str {
        "test"
    }

    async fn generate(&self, request: &ModelRequest) -> Result<ModelResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::NoCandidates))
    }
}

pub fn text(value: &str) -> Result<ModelResponse, LlmError> {
    Ok(ModelResponse {
        parts: vec![ContentPart::Text(value.to_string())],
    })
}

pub fn tool_call(name: &str, args: Value) -> Result<ModelResponse, LlmError> {
    Ok(ModelResponse {
        parts: vec![ContentPart::ToolCall {
            name: name.to_string(),
            args,
        }],
    })
}

/// Router wired to the scripted model and the mock weather server
pub fn test_app(weather_server: &ServerGuard, model: Arc<ScriptedModel>) -> Router {
    let mut config = Config::default();
    config.weather.geocoding_base_url = weather_server.url();
    config.weather.forecast_base_url = weather_server.url();

    let registry = Registry::weather(&config, reqwest::Client::new(), model).unwrap();
    build_router(Arc::new(AppState::new(registry, config)))
}

pub async fn mock_geocoding(server: &mut ServerGuard, city: &str, body: Value) -> Mock {
    server
        .mock("GET", "/search")
        .match_query(Matcher::UrlEncoded("name".into(), city.into()))
        .with_status(200)
        .with_body(body.to_string())
        .create_async()
        .await
}

pub async fn mock_london(server: &mut ServerGuard) -> Mock {
    mock_geocoding(
        server,
        "London",
        json!({"results": [{"latitude": 51.5, "longitude": -0.12, "name": "London"}]}),
    )
    .await
}

pub async fn mock_current_weather(server: &mut ServerGuard) -> Mock {
    server
        .mock("GET", "/forecast")
        .match_query(Matcher::Regex("apparent_temperature".into()))
        .with_status(200)
        .with_body(
            json!({"current": {
                "time": "2024-06-01T12:00",
                "temperature_2m": 18.0,
                "apparent_temperature": 17.0,
                "relative_humidity_2m": 60,
                "wind_speed_10m": 10.0,
                "wind_gusts_10m": 20.0,
                "weather_code": 1
            }})
            .to_string(),
        )
        .create_async()
        .await
}

pub async fn mock_hourly_forecast(server: &mut ServerGuard) -> Mock {
    server
        .mock("GET", "/forecast")
        .match_query(Matcher::AllOf(vec![
            Matcher::Regex("hourly=".into()),
            Matcher::UrlEncoded("forecast_days".into(), "1".into()),
        ]))
        .with_status(200)
        .with_body(
            json!({
                "current": {"time": "2024-06-01T09:00", "temperature_2m": 14.0, "precipitation": 0.0, "weather_code": 0},
                "hourly": {
                    "precipitation_probability": [0, 20, 5],
                    "temperature_2m": [11.0, 21.5, 16.0]
                }
            })
            .to_string(),
        )
        .create_async()
        .await
}

/// Send a request through the router and decode the body
pub async fn send(app: Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).to_string())
        })
    };
    (status, body)
}
