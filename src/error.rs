//! Error types and error handling for the application
//!
//! `AppError` is what handlers return. It converts into a JSON response of the
//! form `{ "error": "<message>" }` with a matching status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::agent::AgentError;
use crate::workflow::WorkflowError;

/// Message used when an error carries no message of its own
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Request body is not JSON
    #[error("Invalid JSON payload")]
    InvalidJson,

    /// Request body failed schema validation (issues joined with ", ")
    #[error("{0}")]
    Validation(String),

    /// No agent registered under the given id
    #[error("Agent not found: {0}")]
    AgentNotFound(String),

    /// No workflow registered under the given id
    #[error("Workflow not found: {0}")]
    WorkflowNotFound(String),

    /// No route matched
    #[error("Not found")]
    RouteNotFound,

    /// Error occurred while an agent produced its reply
    #[error(transparent)]
    Agent(#[from] AgentError),

    /// Error occurred while running a workflow
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// Internal server error (catch-all for unexpected errors)
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidJson => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::AgentNotFound(_) => StatusCode::NOT_FOUND,
            AppError::WorkflowNotFound(_) => StatusCode::NOT_FOUND,
            AppError::RouteNotFound => StatusCode::NOT_FOUND,
            AppError::Agent(AgentError::EmptyConversation) => StatusCode::BAD_REQUEST,
            AppError::Agent(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Workflow(WorkflowError::InvalidTriggerData(_)) => StatusCode::BAD_REQUEST,
            AppError::Workflow(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Replace an empty message with `fallback`
    pub fn or_fallback(self, fallback: &str) -> Self {
        if self.to_string().trim().is_empty() {
            AppError::Internal(anyhow::anyhow!(fallback.to_string()))
        } else {
            self
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut error_message = self.to_string();
        if error_message.trim().is_empty() {
            error_message = UNKNOWN_ERROR.to_string();
        }

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %error_message, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %error_message, "Request rejected");
        }

        let body = Json(json!({ "error": error_message }));

        (status, body).into_response()
    }
}
