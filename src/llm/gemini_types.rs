//! Gemini API wire types
//!
//! Structs that mirror the Gemini `generateContent` JSON request and response.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level Gemini API response
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GeminiApiResponse {
    /// List of candidate responses from the model
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Optional feedback about the prompt (e.g., if it was blocked)
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// A single candidate response from the model
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The content of this candidate (absent when generation was stopped early)
    #[serde(default)]
    pub content: Option<Content>,
    /// Why the model stopped generating (if applicable)
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Content of a request or response turn
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Content {
    /// Role of the content ("user" or "model")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// List of content parts
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A single part of content: text, a function call, or a function response
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Text content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Function call requested by the model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    /// Function result sent back to the model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_response: Option<FunctionResponse>,
}

/// A function call emitted by the model
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FunctionCall {
    /// Function name
    pub name: String,
    /// Arguments object
    #[serde(default)]
    pub args: Value,
}

/// A function result sent to the model
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FunctionResponse {
    /// Function name
    pub name: String,
    /// Result object
    pub response: Value,
}

/// Feedback about the prompt (e.g., if it was blocked)
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Reason the prompt was blocked (if applicable)
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Request structure for Gemini API
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GeminiApiRequest {
    /// Conversation turns
    pub contents: Vec<Content>,
    /// System instructions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    /// Tool declarations
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<GeminiTool>,
}

/// Tool block of a request
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GeminiTool {
    /// Functions the model may call
    pub function_declarations: Vec<FunctionDeclaration>,
}

/// A function the model may call
#[derive(Serialize, Debug)]
pub struct FunctionDeclaration {
    /// Function name
    pub name: String,
    /// What the function does
    pub description: String,
    /// JSON schema of the arguments
    pub parameters: Value,
}
