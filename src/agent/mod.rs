//! Agents
//!
//! An agent pairs instructions and tools with a language model. Replies are
//! produced as a text stream: each model turn's text is yielded as it arrives,
//! and tool calls requested by the model are executed and fed back until the
//! model answers without calling a tool.

pub mod tool;

use std::collections::BTreeMap;
use std::pin::Pin;
use std::sync::Arc;

use futures_util::{Stream, StreamExt};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::llm::{
    ChatMessage, ContentPart, LanguageModel, LlmError, ModelRequest, Role, Turn, TurnRole,
};
use tool::{Tool, ToolInfo};

/// Tool rounds allowed before an agent gives up on a reply
pub const MAX_TOOL_ROUNDS: usize = 5;

/// Streamed reply text
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, AgentError>> + Send>>;

/// Errors raised while an agent produces a reply
#[derive(Error, Debug)]
pub enum AgentError {
    /// No user or assistant message to respond to
    #[error("At least one message is required")]
    EmptyConversation,

    /// The language model call failed
    #[error(transparent)]
    Model(#[from] LlmError),

    /// The model kept calling tools
    #[error("Agent exceeded {0} tool rounds without a final answer")]
    TooManyToolRounds(usize),
}

/// Agent description served by the framework API
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentInfo {
    /// Display name
    pub name: String,
    /// System instructions
    pub instructions: String,
    /// Tools keyed by id
    pub tools: BTreeMap<String, ToolInfo>,
    /// Model provider
    pub provider: String,
    /// Model identifier
    pub model_id: String,
}

/// A conversational agent
pub struct Agent {
    name: String,
    instructions: String,
    model: Arc<dyn LanguageModel>,
    tools: Vec<Arc<dyn Tool>>,
}

impl Agent {
    /// Create an agent without tools
    pub fn new(
        name: impl Into<String>,
        instructions: impl Into<String>,
        model: Arc<dyn LanguageModel>,
    ) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            model,
            tools: Vec::new(),
        }
    }

    /// Give the agent a tool
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Description for the framework API
    pub fn info(&self) -> AgentInfo {
        AgentInfo {
            name: self.name.clone(),
            instructions: self.instructions.clone(),
            tools: self
                .tools
                .iter()
                .map(|tool| (tool.id().to_string(), tool.info()))
                .collect(),
            provider: self.model.provider().to_string(),
            model_id: self.model.model_id().to_string(),
        }
    }

    /// Stream a reply to the conversation
    ///
    /// # Errors
    /// * `AgentError::EmptyConversation` if there is nothing to reply to.
    ///   Model and tool-loop failures surface as stream items and end the stream.
    pub fn stream(&self, messages: Vec<ChatMessage>) -> Result<TextStream, AgentError> {
        let request = self.build_request(messages)?;
        let model = self.model.clone();
        let tools = self.tools.clone();
        let agent_name = self.name.clone();

        let stream = async_stream::stream! {
            let mut request = request;
            let mut round = 0;

            loop {
                let response = match model.generate(&request).await {
                    Ok(response) => response,
                    Err(e) => {
                        yield Err(AgentError::from(e));
                        break;
                    }
                };

                for text in response.texts() {
                    if !text.is_empty() {
                        yield Ok::<String, AgentError>(text.to_string());
                    }
                }

                let calls: Vec<(String, Value)> = response
                    .tool_calls()
                    .map(|(name, args)| (name.to_string(), args.clone()))
                    .collect();

                if calls.is_empty() {
                    break;
                }

                if round == MAX_TOOL_ROUNDS {
                    yield Err(AgentError::TooManyToolRounds(MAX_TOOL_ROUNDS));
                    break;
                }
                round += 1;

                let mut results = Vec::with_capacity(calls.len());
                for (name, args) in calls {
                    let output = run_tool(&tools, &agent_name, &name, args).await;
                    results.push(ContentPart::ToolResult { name, response: output });
                }

                request.turns.push(Turn {
                    role: TurnRole::Model,
                    parts: response.parts,
                });
                request.turns.push(Turn {
                    role: TurnRole::User,
                    parts: results,
                });
            }
        };

        Ok(Box::pin(stream))
    }

    /// Produce the whole reply at once
    pub async fn generate(&self, messages: Vec<ChatMessage>) -> Result<String, AgentError> {
        let mut stream = self.stream(messages)?;
        let mut content = String::new();
        while let Some(chunk) = stream.next().await {
            content.push_str(&chunk?);
        }
        Ok(content)
    }

    fn build_request(&self, messages: Vec<ChatMessage>) -> Result<ModelRequest, AgentError> {
        let mut system_parts = vec![self.instructions.clone()];
        let mut turns = Vec::with_capacity(messages.len());

        for message in messages {
            match message.role {
                Role::System => system_parts.push(message.content),
                Role::User => turns.push(Turn::user_text(message.content)),
                Role::Assistant => turns.push(Turn::model_text(message.content)),
            }
        }

        if turns.is_empty() {
            return Err(AgentError::EmptyConversation);
        }

        let system_instruction = system_parts
            .into_iter()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");

        Ok(ModelRequest {
            system_instruction: Some(system_instruction).filter(|s| !s.is_empty()),
            turns,
            tools: self.tools.iter().map(|tool| tool.declaration()).collect(),
        })
    }
}

/// Execute a tool call; failures are reported back to the model as `{ error }`
async fn run_tool(tools: &[Arc<dyn Tool>], agent_name: &str, name: &str, args: Value) -> Value {
    let Some(tool) = tools.iter().find(|tool| tool.id() == name) else {
        tracing::warn!(agent = %agent_name, tool = %name, "Model called an unknown tool");
        return json!({ "error": format!("Unknown tool: {}", name) });
    };

    tracing::debug!(agent = %agent_name, tool = %name, "Executing tool call");

    match tool.execute(args).await {
        Ok(output) => output,
        Err(e) => {
            tracing::warn!(agent = %agent_name, tool = %name, error = %e, "Tool call failed");
            json!({ "error": e.to_string() })
        }
    }
}
