//! Language model layer
//!
//! A provider-neutral request/response model plus the `LanguageModel` trait
//! agents talk to. The Gemini client is the production implementation.

pub mod gemini;
pub mod gemini_types;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Who authored a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// End user
    User,
    /// The agent
    Assistant,
    /// Extra instructions
    System,
}

/// A single chat message as accepted by agents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author of the message
    pub role: Role,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Turn author from the model's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    /// User input and tool results
    User,
    /// Model output
    Model,
}

/// One piece of a model turn
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    /// Plain text
    Text(String),
    /// The model asks for a tool invocation
    ToolCall {
        /// Tool name
        name: String,
        /// Arguments object
        args: Value,
    },
    /// Result of a tool invocation sent back to the model
    ToolResult {
        /// Tool name
        name: String,
        /// Result object
        response: Value,
    },
}

/// A turn in the conversation sent to the model
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    /// Author of the turn
    pub role: TurnRole,
    /// Content of the turn
    pub parts: Vec<ContentPart>,
}

impl Turn {
    /// A user turn holding text
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            parts: vec![ContentPart::Text(text.into())],
        }
    }

    /// A model turn holding text
    pub fn model_text(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Model,
            parts: vec![ContentPart::Text(text.into())],
        }
    }
}

/// Tool description advertised to the model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDeclaration {
    /// Tool name the model uses to call it
    pub name: String,
    /// What the tool does
    pub description: String,
    /// JSON schema of the arguments object
    pub parameters: Value,
}

/// Everything the model needs for one generation
#[derive(Debug, Clone, Default)]
pub struct ModelRequest {
    /// System instructions
    pub system_instruction: Option<String>,
    /// Conversation so far
    pub turns: Vec<Turn>,
    /// Tools the model may call
    pub tools: Vec<ToolDeclaration>,
}

/// One generated model turn
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelResponse {
    /// Generated parts, in order
    pub parts: Vec<ContentPart>,
}

impl ModelResponse {
    /// Tool calls requested in this turn
    pub fn tool_calls(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.parts.iter().filter_map(|part| match part {
            ContentPart::ToolCall { name, args } => Some((name.as_str(), args)),
            _ => None,
        })
    }

    /// Text parts of this turn
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().filter_map(|part| match part {
            ContentPart::Text(text) => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Errors raised by language model providers
#[derive(Error, Debug)]
pub enum LlmError {
    /// No API key configured
    #[error("GEMINI_API_KEY environment variable is not set or is empty. Please set it to use the Gemini API.")]
    MissingApiKey,

    /// The HTTP request could not be sent
    #[error("Failed to send HTTP request to Gemini API: {0}")]
    Request(String),

    /// Too many requests
    #[error("Gemini API rate limit exceeded (HTTP 429): {0}")]
    RateLimited(String),

    /// Any other non-success status
    #[error("Gemini API returned error status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// The response body could not be decoded
    #[error("Failed to parse JSON response from Gemini API: {0}")]
    Parse(String),

    /// The prompt was rejected by safety filters
    #[error("Gemini API blocked the prompt: {0}")]
    Blocked(String),

    /// The response carried nothing usable
    #[error("Gemini API response contains no candidates")]
    NoCandidates,
}

/// A text generation backend with tool calling
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Model identifier (e.g. "gemini-2.5-flash")
    fn model_id(&self) -> &str;

    /// Provider name (e.g. "google")
    fn provider(&self) -> &str;

    /// Generate the next model turn
    async fn generate(&self, request: &ModelRequest) -> Result<ModelResponse, LlmError>;
}
