//! Gemini API client
//!
//! Direct HTTP client for the Gemini `generateContent` endpoint, with function
//! calling so agents can use tools.

use crate::config::LlmConfig;
use crate::llm::gemini_types::{
    Content, FunctionCall, FunctionDeclaration, FunctionResponse, GeminiApiRequest,
    GeminiApiResponse, GeminiTool, Part,
};
use crate::llm::{
    ContentPart, LanguageModel, LlmError, ModelRequest, ModelResponse, Turn, TurnRole,
};
use async_trait::async_trait;

/// Gemini-backed language model
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a client from configuration, sharing the given HTTP client
    pub fn new(client: reqwest::Client, config: &LlmConfig) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, api_key: &str) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        )
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    fn model_id(&self) -> &str {
        &self.model
    }

    fn provider(&self) -> &str {
        "google"
    }

    /// Call Gemini with the conversation and tool declarations
    ///
    /// # Errors
    /// * `LlmError::MissingApiKey` if no API key is configured
    /// * `LlmError::RateLimited` / `LlmError::Status` on non-success statuses
    /// * `LlmError::Parse` if the body is not a Gemini response
    /// * `LlmError::Blocked` if the prompt was blocked
    /// * `LlmError::NoCandidates` if the response carries no content
    async fn generate(&self, request: &ModelRequest) -> Result<ModelResponse, LlmError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(LlmError::MissingApiKey)?;

        let request_body = to_api_request(request);

        tracing::debug!(
            model = %self.model,
            turns = request.turns.len(),
            tools = request.tools.len(),
            "Calling Gemini API"
        );

        // Make POST request using shared client (connection pooling)
        let response = self
            .client
            .post(self.endpoint(api_key))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());

            tracing::error!(
                status_code = status_code,
                error_body = %error_body,
                "Gemini API returned error status"
            );

            if status_code == 429 {
                return Err(LlmError::RateLimited(error_body));
            }

            return Err(LlmError::Status {
                status: status_code,
                body: error_body,
            });
        }

        let response_body = response
            .text()
            .await
            .map_err(|e| LlmError::Request(e.to_string()))?;

        let parsed: GeminiApiResponse = serde_json::from_str(&response_body)
            .map_err(|e| LlmError::Parse(format!("{} - Response body: {}", e, response_body)))?;

        from_api_response(parsed)
    }
}

fn to_api_request(request: &ModelRequest) -> GeminiApiRequest {
    let contents = request.turns.iter().map(to_content).collect();

    let system_instruction = request.system_instruction.as_ref().map(|text| Content {
        role: None,
        parts: vec![Part {
            text: Some(text.clone()),
            ..Default::default()
        }],
    });

    let tools = if request.tools.is_empty() {
        Vec::new()
    } else {
        vec![GeminiTool {
            function_declarations: request
                .tools
                .iter()
                .map(|tool| FunctionDeclaration {
                    name: tool.name.clone(),
                    description: tool.description.clone(),
                    parameters: tool.parameters.clone(),
                })
                .collect(),
        }]
    };

    GeminiApiRequest {
        contents,
        system_instruction,
        tools,
    }
}

fn to_content(turn: &Turn) -> Content {
    let role = match turn.role {
        TurnRole::User => "user",
        TurnRole::Model => "model",
    };

    let parts = turn
        .parts
        .iter()
        .map(|part| match part {
            ContentPart::Text(text) => Part {
                text: Some(text.clone()),
                ..Default::default()
            },
            ContentPart::ToolCall { name, args } => Part {
                function_call: Some(FunctionCall {
                    name: name.clone(),
                    args: args.clone(),
                }),
                ..Default::default()
            },
            ContentPart::ToolResult { name, response } => Part {
                function_response: Some(FunctionResponse {
                    name: name.clone(),
                    response: response.clone(),
                }),
                ..Default::default()
            },
        })
        .collect();

    Content {
        role: Some(role.to_string()),
        parts,
    }
}

fn from_api_response(parsed: GeminiApiResponse) -> Result<ModelResponse, LlmError> {
    if let Some(reason) = parsed
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.as_ref())
    {
        return Err(LlmError::Blocked(reason.clone()));
    }

    let candidate = parsed
        .candidates
        .into_iter()
        .next()
        .ok_or(LlmError::NoCandidates)?;

    let content = match candidate.content {
        Some(content) => content,
        None => {
            let reason = candidate
                .finish_reason
                .unwrap_or_else(|| "no content".to_string());
            return Err(LlmError::Blocked(reason));
        }
    };

    let parts = content
        .parts
        .into_iter()
        .filter_map(|part| {
            if let Some(call) = part.function_call {
                Some(ContentPart::ToolCall {
                    name: call.name,
                    args: call.args,
                })
            } else {
                part.text.map(ContentPart::Text)
            }
        })
        .collect();

    Ok(ModelResponse { parts })
}
