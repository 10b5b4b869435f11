//! Framework API handlers
//!
//! The `/api` surface: list and inspect registered agents and workflows,
//! generate agent replies, and run workflows by id.

use std::collections::BTreeMap;

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::agent::AgentInfo;
use crate::api::validation::{parse_request_body, GenerateRequest};
use crate::error::AppError;
use crate::state::SharedState;
use crate::workflow::{WorkflowInfo, WorkflowRunResult};

/// Status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Always "ok"
    pub status: String,
}

/// Generated agent reply
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    /// Full reply text
    pub text: String,
}

/// GET /api - Liveness check
pub async fn api_status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
    })
}

/// GET /api/agents - List all agents
pub async fn list_agents(
    State(state): State<SharedState>,
) -> Result<Json<BTreeMap<String, AgentInfo>>, AppError> {
    let agents = state
        .registry
        .agents()
        .iter()
        .map(|(id, agent)| (id.clone(), agent.info()))
        .collect();

    Ok(Json(agents))
}

/// GET /api/agents/:agentId - Get a specific agent
pub async fn get_agent(
    State(state): State<SharedState>,
    Path(agent_id): Path<String>,
) -> Result<Json<AgentInfo>, AppError> {
    let agent = state
        .registry
        .agent(&agent_id)
        .ok_or_else(|| AppError::AgentNotFound(agent_id.clone()))?;

    Ok(Json(agent.info()))
}

/// POST /api/agents/:agentId/generate - Generate a full reply
pub async fn generate(
    State(state): State<SharedState>,
    Path(agent_id): Path<String>,
    body: Bytes,
) -> Result<Json<GenerateResponse>, AppError> {
    let agent = state
        .registry
        .agent(&agent_id)
        .ok_or_else(|| AppError::AgentNotFound(agent_id.clone()))?;

    let request: GenerateRequest = parse_request_body(&body)?;

    let text = agent
        .generate(request.into_messages())
        .await
        .map_err(|e| AppError::from(e).or_fallback("Failed to generate response"))?;

    Ok(Json(GenerateResponse { text }))
}

/// GET /api/workflows - List all workflows
pub async fn list_workflows(
    State(state): State<SharedState>,
) -> Result<Json<BTreeMap<String, WorkflowInfo>>, AppError> {
    let workflows = state
        .registry
        .workflows()
        .iter()
        .map(|(id, workflow)| (id.clone(), workflow.info()))
        .collect();

    Ok(Json(workflows))
}

/// GET /api/workflows/:workflowId - Get a specific workflow
pub async fn get_workflow(
    State(state): State<SharedState>,
    Path(workflow_id): Path<String>,
) -> Result<Json<WorkflowInfo>, AppError> {
    let workflow = state
        .registry
        .workflow(&workflow_id)
        .ok_or_else(|| AppError::WorkflowNotFound(workflow_id.clone()))?;

    Ok(Json(workflow.info()))
}

/// POST /api/workflows/:workflowId/run - Run a workflow with the body as trigger data
pub async fn run_workflow(
    State(state): State<SharedState>,
    Path(workflow_id): Path<String>,
    body: Bytes,
) -> Result<Json<WorkflowRunResult>, AppError> {
    let workflow = state
        .registry
        .workflow(&workflow_id)
        .ok_or_else(|| AppError::WorkflowNotFound(workflow_id.clone()))?;

    let trigger_data: Value = serde_json::from_slice(&body).map_err(|_| AppError::InvalidJson)?;

    let run = workflow.create_run();
    tracing::info!(
        run_id = %run.run_id(),
        workflow = %workflow_id,
        "Workflow run started"
    );

    let result = run
        .start(trigger_data)
        .await
        .map_err(|e| AppError::from(e).or_fallback("Failed to run workflow"))?;

    Ok(Json(result))
}
