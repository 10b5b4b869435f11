//! Tools agents can call

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::llm::ToolDeclaration;

/// Errors raised while executing a tool
#[derive(Error, Debug)]
pub enum ToolError {
    /// Arguments did not match the input schema
    #[error("Invalid tool input: {0}")]
    InvalidInput(String),

    /// The tool ran but failed
    #[error("{0}")]
    Failed(String),
}

/// Description of a tool as exposed by the framework API
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInfo {
    /// Tool identifier
    pub id: String,
    /// What the tool does
    pub description: String,
    /// JSON schema of the input
    pub input_schema: Value,
    /// JSON schema of the output
    pub output_schema: Value,
}

/// A capability an agent can invoke with JSON arguments
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool identifier, also the function name shown to the model
    fn id(&self) -> &str;

    /// What the tool does
    fn description(&self) -> &str;

    /// JSON schema of the arguments object
    fn input_schema(&self) -> Value;

    /// JSON schema of the result object
    fn output_schema(&self) -> Value;

    /// Run the tool
    async fn execute(&self, input: Value) -> Result<Value, ToolError>;

    /// Declaration advertised to the language model
    fn declaration(&self) -> ToolDeclaration {
        ToolDeclaration {
            name: self.id().to_string(),
            description: self.description().to_string(),
            parameters: self.input_schema(),
        }
    }

    /// Description served by the framework API
    fn info(&self) -> ToolInfo {
        ToolInfo {
            id: self.id().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
            output_schema: self.output_schema(),
        }
    }
}
