//! HTTP-level tests for the weather endpoints and the framework API
//!
//! Requests go through the full router; the language model is scripted and
//! the Open-Meteo APIs are served by mockito.

mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use common::{
    mock_current_weather, mock_geocoding, mock_hourly_forecast, mock_london, send, test_app, text,
    tool_call, ScriptedModel,
};
use mockito::Server;
use serde_json::json;
use weather_agent_server::config::Config;
use weather_agent_server::registry::Registry;
use weather_agent_server::server::build_router;
use weather_agent_server::state::AppState;
use weather_agent_server::workflow::{
    StepContext, StepOutcome, Workflow, WorkflowError, WorkflowStep,
};

#[tokio::test]
async fn test_weather_agent_reply() {
    let server = Server::new_async().await;
    let model = ScriptedModel::new(vec![text("It is sunny "), text("unused")]);
    let app = test_app(&server, model.clone());

    let (status, body) = send(app, "POST", "/agents/weather", r#"{"message":"Hi"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], "It is sunny ");
    assert_eq!(model.request_count(), 1);
}

#[tokio::test]
async fn test_weather_agent_calls_weather_tool() {
    let mut server = Server::new_async().await;
    let geocoding = mock_london(&mut server).await;
    let forecast = mock_current_weather(&mut server).await;

    let model = ScriptedModel::new(vec![
        tool_call("get-weather", json!({"location": "London"})),
        text("London is 18°C and mainly clear."),
    ]);
    let app = test_app(&server, model.clone());

    let (status, body) = send(
        app,
        "POST",
        "/agents/weather",
        r#"{"message":"What's the weather in London?"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], "London is 18°C and mainly clear.");
    geocoding.assert_async().await;
    forecast.assert_async().await;

    // The second model call carries the tool result
    let requests = model.requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    let carried_result = requests[1].turns.iter().flat_map(|turn| &turn.parts).any(|part| {
        matches!(
            part,
            weather_agent_server::llm::ContentPart::ToolResult { response, .. }
                if response["conditions"] == "Mainly clear" && response["location"] == "London"
        )
    });
    assert!(carried_result);
}

#[tokio::test]
async fn test_weather_agent_requires_message() {
    let server = Server::new_async().await;

    for body in [r#"{}"#, r#"{"message":""}"#, r#"{"message":42}"#] {
        let app = test_app(&server, ScriptedModel::new(vec![]));
        let (status, response) = send(app, "POST", "/agents/weather", body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(response, json!({"error": "Message is required"}));
    }
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let server = Server::new_async().await;

    for uri in ["/agents/weather", "/workflows/weather"] {
        let app = test_app(&server, ScriptedModel::new(vec![]));
        let (status, body) = send(app, "POST", uri, "{not json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "uri: {}", uri);
        assert_eq!(body, json!({"error": "Invalid JSON payload"}));
    }
}

#[tokio::test]
async fn test_non_object_body_is_rejected() {
    let server = Server::new_async().await;
    let app = test_app(&server, ScriptedModel::new(vec![]));

    let (status, body) = send(app, "POST", "/agents/weather", r#"["Hi"]"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Expected object"}));
}

#[tokio::test]
async fn test_weather_agent_model_failure_is_500() {
    let server = Server::new_async().await;
    // An empty script makes every model call fail
    let app = test_app(&server, ScriptedModel::new(vec![]));

    let (status, body) = send(app, "POST", "/agents/weather", r#"{"message":"Hi"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Gemini API response contains no candidates");
}

#[tokio::test]
async fn test_weather_workflow_runs_both_steps() {
    let mut server = Server::new_async().await;
    mock_london(&mut server).await;
    mock_hourly_forecast(&mut server).await;

    let model = ScriptedModel::new(vec![text("Go for a walk along the Thames.")]);
    let app = test_app(&server, model.clone());

    let (status, body) = send(app, "POST", "/workflows/weather", r#"{"city":"London"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["runId"].as_str().is_some_and(|id| !id.is_empty()));
    assert!(body["timestamp"].is_i64());

    let fetched = &body["results"]["fetch-weather"];
    assert_eq!(fetched["status"], "success");
    assert_eq!(fetched["output"]["location"], "London");
    assert_eq!(fetched["output"]["maxTemp"], 21.5);
    assert_eq!(fetched["output"]["minTemp"], 11.0);
    assert_eq!(fetched["output"]["precipitationChance"], 20.0);
    assert_eq!(fetched["output"]["condition"], "Clear sky");

    let planned = &body["results"]["plan-activities"];
    assert_eq!(planned["status"], "success");
    assert_eq!(
        planned["output"]["activities"],
        "Go for a walk along the Thames."
    );

    let paths = body["activePaths"].as_array().unwrap();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0]["stepId"], "plan-activities");
    assert_eq!(paths[0]["status"], "completed");
    assert_eq!(
        paths[0]["stepPath"],
        json!(["fetch-weather", "plan-activities"])
    );

    // The planner sees the forecast in its prompt
    let requests = model.requests.lock().unwrap();
    let prompt = requests[0].turns[0].parts.iter().find_map(|part| match part {
        weather_agent_server::llm::ContentPart::Text(text) => Some(text.clone()),
        _ => None,
    });
    assert!(prompt.is_some_and(|prompt| prompt.contains("London")));
}

#[tokio::test]
async fn test_weather_workflow_unknown_city_fails_first_step() {
    let mut server = Server::new_async().await;
    mock_geocoding(&mut server, "Atlantis", json!({})).await;

    let model = ScriptedModel::new(vec![]);
    let app = test_app(&server, model.clone());

    let (status, body) = send(app, "POST", "/workflows/weather", r#"{"city":"Atlantis"}"#).await;

    assert_eq!(status, StatusCode::OK);
    let fetched = &body["results"]["fetch-weather"];
    assert_eq!(fetched["status"], "failed");
    assert!(fetched["error"]
        .as_str()
        .is_some_and(|error| error.contains("not found")));
    assert!(body["results"].get("plan-activities").is_none());
    assert_eq!(body["activePaths"][0]["stepId"], "fetch-weather");
    assert_eq!(body["activePaths"][0]["status"], "failed");
    assert_eq!(model.request_count(), 0);
}

#[tokio::test]
async fn test_weather_workflow_requires_city() {
    let server = Server::new_async().await;

    for body in [r#"{}"#, r#"{"city":""}"#] {
        let app = test_app(&server, ScriptedModel::new(vec![]));
        let (status, response) = send(app, "POST", "/workflows/weather", body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(response, json!({"error": "City is required"}));
    }
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let server = Server::new_async().await;
    let app = test_app(&server, ScriptedModel::new(vec![]));

    let (status, body) = send(app, "GET", "/nope", "").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Not found"}));
}

#[tokio::test]
async fn test_api_status() {
    let server = Server::new_async().await;
    let app = test_app(&server, ScriptedModel::new(vec![]));

    let (status, body) = send(app, "GET", "/api", "").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_api_lists_agents_and_workflows() {
    let server = Server::new_async().await;

    let app = test_app(&server, ScriptedModel::new(vec![]));
    let (status, agents) = send(app, "GET", "/api/agents", "").await;
    assert_eq!(status, StatusCode::OK);
    let weather_agent = &agents["weatherAgent"];
    assert_eq!(weather_agent["name"], "Weather Agent");
    assert_eq!(weather_agent["provider"], "test");
    assert_eq!(weather_agent["modelId"], "scripted-model");
    assert!(weather_agent["tools"]["get-weather"]["inputSchema"].is_object());

    let app = test_app(&server, ScriptedModel::new(vec![]));
    let (status, workflows) = send(app, "GET", "/api/workflows", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        workflows["weatherWorkflow"]["steps"],
        json!([
            {"id": "fetch-weather", "description": "Fetches weather forecast for a given city"},
            {"id": "plan-activities", "description": "Suggests activities based on weather conditions"}
        ])
    );
}

#[tokio::test]
async fn test_api_get_agent_and_workflow() {
    let server = Server::new_async().await;

    let app = test_app(&server, ScriptedModel::new(vec![]));
    let (status, agent) = send(app, "GET", "/api/agents/weatherAgent", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(agent["name"], "Weather Agent");

    let app = test_app(&server, ScriptedModel::new(vec![]));
    let (status, workflow) = send(app, "GET", "/api/workflows/weatherWorkflow", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(workflow["name"], "weather-workflow");
}

#[tokio::test]
async fn test_api_unknown_ids_are_404() {
    let server = Server::new_async().await;

    let app = test_app(&server, ScriptedModel::new(vec![]));
    let (status, body) = send(app, "GET", "/api/agents/ghost", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Agent not found: ghost"}));

    let app = test_app(&server, ScriptedModel::new(vec![]));
    let (status, _) = send(app, "POST", "/api/agents/ghost/generate", r#"{"messages":"hi"}"#).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let app = test_app(&server, ScriptedModel::new(vec![]));
    let (status, _) = send(app, "GET", "/api/workflows/ghost", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let app = test_app(&server, ScriptedModel::new(vec![]));
    let (status, _) = send(app, "POST", "/api/workflows/ghost/run", r#"{}"#).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_api_generate_accepts_text_and_message_list() {
    let server = Server::new_async().await;

    let model = ScriptedModel::new(vec![text("Hello there")]);
    let app = test_app(&server, model);
    let (status, body) = send(
        app,
        "POST",
        "/api/agents/weatherAgent/generate",
        r#"{"messages":"Hi"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"text": "Hello there"}));

    let model = ScriptedModel::new(vec![text("Still here")]);
    let app = test_app(&server, model.clone());
    let (status, body) = send(
        app,
        "POST",
        "/api/agents/weatherAgent/generate",
        r#"{"messages":[{"role":"user","content":"Hi"},{"role":"assistant","content":"Hello"},{"role":"user","content":"Are you there?"}]}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "Still here");
    assert_eq!(model.requests.lock().unwrap()[0].turns.len(), 3);
}

#[tokio::test]
async fn test_api_generate_requires_messages() {
    let server = Server::new_async().await;
    let app = test_app(&server, ScriptedModel::new(vec![]));

    let (status, body) = send(app, "POST", "/api/agents/weatherAgent/generate", r#"{}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Messages are required"}));
}

#[tokio::test]
async fn test_api_run_workflow_uses_body_as_trigger() {
    let mut server = Server::new_async().await;
    mock_london(&mut server).await;
    mock_hourly_forecast(&mut server).await;

    let app = test_app(&server, ScriptedModel::new(vec![text("Museums.")]));
    let (status, body) = send(
        app,
        "POST",
        "/api/workflows/weatherWorkflow/run",
        r#"{"city":"London"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"]["plan-activities"]["output"]["activities"], "Museums.");
}

#[tokio::test]
async fn test_api_run_workflow_rejects_bad_trigger() {
    let server = Server::new_async().await;

    for body in [r#"{}"#, r#"{"city":""}"#] {
        let model = ScriptedModel::new(vec![]);
        let app = test_app(&server, model.clone());
        let (status, response) =
            send(app, "POST", "/api/workflows/weatherWorkflow/run", body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(
            response,
            json!({"error": "Invalid trigger data: City is required"})
        );
        assert_eq!(model.request_count(), 0);
    }

    let app = test_app(&server, ScriptedModel::new(vec![]));
    let (status, response) =
        send(app, "POST", "/api/workflows/weatherWorkflow/run", r#""London""#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response,
        json!({"error": "Invalid trigger data: Expected object"})
    );
}

struct StallStep;

#[async_trait]
impl WorkflowStep for StallStep {
    fn id(&self) -> &str {
        "stall"
    }

    fn description(&self) -> &str {
        "Never finishes in time"
    }

    async fn execute(&self, _context: &StepContext) -> Result<StepOutcome, WorkflowError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(StepOutcome::Success(json!(null)))
    }
}

#[tokio::test]
async fn test_api_run_workflow_timeout_is_500() {
    let workflow = Workflow::builder("stalling")
        .step(Arc::new(StallStep))
        .run_timeout(Duration::from_millis(50))
        .build()
        .unwrap();
    let registry = Registry::new().with_workflow("stalling", workflow);
    let app = build_router(Arc::new(AppState::new(registry, Config::default())));

    let (status, body) = send(app, "POST", "/api/workflows/stalling/run", r#"{}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Workflow run timed out after 50ms"}));
}
