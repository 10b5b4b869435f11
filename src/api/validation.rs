//! Request body validation
//!
//! Bodies are read as raw bytes so that undecodable JSON and schema violations
//! produce distinct 400 messages: "Invalid JSON payload" for the former, the
//! schema's issue messages joined with ", " for the latter.

use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;

/// A request body shape with its own validation messages
pub trait RequestSchema: Sized {
    /// Validate a decoded JSON value, collecting every issue found
    fn from_json(value: &Value) -> Result<Self, Vec<String>>;
}

/// Decode and validate a request body
///
/// # Errors
/// * `AppError::InvalidJson` if the body is not JSON
/// * `AppError::Validation` with the joined issue messages otherwise
pub fn parse_request_body<T: RequestSchema>(body: &[u8]) -> Result<T, AppError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| AppError::InvalidJson)?;
    T::from_json(&value).map_err(|issues| AppError::Validation(issues.join(", ")))
}

/// Read a required, non-empty string field
///
/// Missing fields, non-strings and empty strings all report `message`.
pub fn required_string(
    object: &serde_json::Map<String, Value>,
    field: &str,
    message: &str,
    issues: &mut Vec<String>,
) -> Option<String> {
    match object.get(field).and_then(Value::as_str) {
        Some(value) if !value.is_empty() => Some(value.to_string()),
        _ => {
            issues.push(message.to_string());
            None
        }
    }
}

fn expect_object(value: &Value) -> Result<&serde_json::Map<String, Value>, Vec<String>> {
    value
        .as_object()
        .ok_or_else(|| vec!["Expected object".to_string()])
}

/// Body of `POST /agents/weather`
#[derive(Debug, Clone, PartialEq)]
pub struct AgentChatRequest {
    /// User message
    pub message: String,
}

impl RequestSchema for AgentChatRequest {
    fn from_json(value: &Value) -> Result<Self, Vec<String>> {
        let object = expect_object(value)?;
        let mut issues = Vec::new();
        let message = required_string(object, "message", "Message is required", &mut issues);
        match message {
            Some(message) if issues.is_empty() => Ok(Self { message }),
            _ => Err(issues),
        }
    }
}

/// Body of `POST /workflows/weather`
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowRequest {
    /// City to plan for
    pub city: String,
}

impl RequestSchema for WorkflowRequest {
    fn from_json(value: &Value) -> Result<Self, Vec<String>> {
        let object = expect_object(value)?;
        let mut issues = Vec::new();
        let city = required_string(object, "city", "City is required", &mut issues);
        match city {
            Some(city) if issues.is_empty() => Ok(Self { city }),
            _ => Err(issues),
        }
    }
}

/// Messages accepted by the generate endpoint: a bare string or a chat list
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MessagesInput {
    /// A single user message
    Text(String),
    /// A full conversation
    Messages(Vec<crate::llm::ChatMessage>),
}

/// Body of `POST /api/agents/:agentId/generate`
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    /// Conversation to respond to
    pub messages: MessagesInput,
}

impl RequestSchema for GenerateRequest {
    fn from_json(value: &Value) -> Result<Self, Vec<String>> {
        expect_object(value)?;
        if value.get("messages").is_none() {
            return Err(vec!["Messages are required".to_string()]);
        }
        GenerateRequest::deserialize(value).map_err(|_| {
            vec!["Messages must be a string or a list of { role, content } objects".to_string()]
        })
    }
}

impl GenerateRequest {
    /// Normalize into a chat list
    pub fn into_messages(self) -> Vec<crate::llm::ChatMessage> {
        match self.messages {
            MessagesInput::Text(text) => vec![crate::llm::ChatMessage::user(text)],
            MessagesInput::Messages(messages) => messages,
        }
    }
}
