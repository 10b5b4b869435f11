//! Weather endpoints
//!
//! `POST /agents/weather` chats with the weather agent; `POST /workflows/weather`
//! runs the weather workflow for a city.

use axum::{body::Bytes, extract::State, Json};
use futures_util::StreamExt;
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::api::validation::{parse_request_body, AgentChatRequest, WorkflowRequest};
use crate::error::AppError;
use crate::llm::ChatMessage;
use crate::registry::{WEATHER_AGENT_ID, WEATHER_WORKFLOW_ID};
use crate::state::SharedState;
use crate::workflow::WorkflowRunResult;

/// Agent chat response
#[derive(Debug, Serialize)]
pub struct AgentReply {
    /// Full reply text
    pub reply: String,
}

/// POST /agents/weather - Chat with the weather agent
pub async fn chat_with_weather_agent(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<AgentReply>, AppError> {
    let request: AgentChatRequest = parse_request_body(&body)?;

    let agent = state
        .registry
        .agent(WEATHER_AGENT_ID)
        .ok_or_else(|| AppError::AgentNotFound(WEATHER_AGENT_ID.to_string()))?;

    info!(
        agent = %agent.name(),
        message_len = request.message.len(),
        "Weather agent request received"
    );

    let mut stream = agent.stream(vec![ChatMessage::user(request.message)])?;
    let mut content = String::new();
    while let Some(chunk) = stream.next().await {
        content.push_str(&chunk?);
    }

    info!(reply_len = content.len(), "Weather agent reply assembled");

    Ok(Json(AgentReply { reply: content }))
}

/// POST /workflows/weather - Run the weather workflow for a city
pub async fn run_weather_workflow(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<WorkflowRunResult>, AppError> {
    let request: WorkflowRequest = parse_request_body(&body)?;

    let workflow = state
        .registry
        .workflow(WEATHER_WORKFLOW_ID)
        .ok_or_else(|| AppError::WorkflowNotFound(WEATHER_WORKFLOW_ID.to_string()))?;

    let run = workflow.create_run();
    info!(
        run_id = %run.run_id(),
        city = %request.city,
        "Weather workflow run started"
    );

    let result = run.start(json!({ "city": request.city })).await?;

    Ok(Json(result))
}
