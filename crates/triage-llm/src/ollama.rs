//! Ollama chat API provider
//!
//! Speaks the non-streaming `/api/chat` endpoint. Ollama does not assign
//! ids to the tool calls it returns, so this adapter synthesizes one per
//! call; the rest of the pipeline relies on them for result correlation.

use crate::provider::{LlmError, LlmResult, ReasoningPort};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};
use triage_core::{Message, Role, ToolCall, ToolDefinition};

const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "qwen2.5:0.5b";

/// Ollama connection settings
#[derive(Clone, Debug)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub num_ctx: u32,
    pub timeout: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.1,
            num_ctx: 2048,
            timeout: Duration::from_secs(60),
        }
    }
}

impl OllamaConfig {
    /// Read OLLAMA_* overrides from the environment, falling back to the
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("OLLAMA_BASE_URL").unwrap_or(defaults.base_url),
            model: std::env::var("OLLAMA_MODEL").unwrap_or(defaults.model),
            temperature: env_parse("OLLAMA_TEMPERATURE", defaults.temperature),
            num_ctx: env_parse("OLLAMA_NUM_CTX", defaults.num_ctx),
            timeout: Duration::from_secs(env_parse("OLLAMA_TIMEOUT_SECS", 60)),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

pub struct OllamaProvider {
    client: Client,
    config: OllamaConfig,
}

impl OllamaProvider {
    pub fn new(config: OllamaConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    async fn chat(
        &self,
        messages: Vec<OllamaMessage>,
        tools: Option<Vec<OllamaTool>>,
    ) -> LlmResult<OllamaMessage> {
        let body = OllamaRequest {
            model: self.config.model.clone(),
            messages,
            stream: false,
            tools,
            options: OllamaOptions {
                temperature: self.config.temperature,
                num_ctx: self.config.num_ctx,
            },
        };

        debug!(
            "Ollama request: model={} messages={}",
            body.model,
            body.messages.len()
        );

        let response = self
            .client
            .post(format!("{}/api/chat", self.config.base_url))
            .timeout(self.config.timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Ollama error {}: {}", status, error_text);
            return Err(LlmError::RequestFailed(format!("{}: {}", status, error_text)));
        }

        let parsed: OllamaResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        Ok(parsed.message)
    }
}

#[async_trait::async_trait]
impl ReasoningPort for OllamaProvider {
    fn name(&self) -> &str { "ollama" }

    async fn converse(
        &self,
        history: &[Message],
        tools: &[ToolDefinition],
    ) -> LlmResult<Message> {
        let messages = history.iter().map(to_wire).collect();
        let tools = if tools.is_empty() {
            None
        } else {
            Some(tools.iter().map(to_wire_tool).collect())
        };

        let reply = self.chat(messages, tools).await?;
        Ok(from_wire(reply))
    }

    async fn complete(&self, prompt: &str) -> LlmResult<String> {
        let messages = vec![OllamaMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
            tool_calls: None,
        }];

        let reply = self.chat(messages, None).await?;
        Ok(reply.content)
    }
}

fn wire_role(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
        Role::Tool => "tool",
    }
}

fn to_wire(message: &Message) -> OllamaMessage {
    OllamaMessage {
        role: wire_role(message.role).to_string(),
        content: message.content.clone(),
        tool_calls: message.tool_calls.as_ref().map(|calls| {
            calls
                .iter()
                .map(|c| OllamaToolCall {
                    function: OllamaFunctionCall {
                        name: c.name.clone(),
                        arguments: c.arguments.clone(),
                    },
                })
                .collect()
        }),
    }
}

fn from_wire(message: OllamaMessage) -> Message {
    match message.tool_calls {
        Some(calls) if !calls.is_empty() => {
            let calls = calls
                .into_iter()
                .map(|c| ToolCall {
                    id: new_call_id(),
                    name: c.function.name,
                    arguments: c.function.arguments,
                })
                .collect();
            Message::assistant_with_tools(message.content, calls)
        }
        _ => Message::assistant(message.content),
    }
}

fn new_call_id() -> String {
    format!("call_{}", uuid::Uuid::new_v4().simple())
}

#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<OllamaTool>>,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_ctx: u32,
}

#[derive(Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<OllamaToolCall>>,
}

#[derive(Serialize, Deserialize)]
struct OllamaToolCall {
    function: OllamaFunctionCall,
}

#[derive(Serialize, Deserialize)]
struct OllamaFunctionCall {
    name: String,
    arguments: serde_json::Value,
}

#[derive(Serialize)]
struct OllamaTool {
    #[serde(rename = "type")]
    kind: String,
    function: OllamaFunction,
}

#[derive(Serialize)]
struct OllamaFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

fn to_wire_tool(def: &ToolDefinition) -> OllamaTool {
    OllamaTool {
        kind: "function".to_string(),
        function: OllamaFunction {
            name: def.name.clone(),
            description: def.description.clone(),
            parameters: def.input_schema.clone(),
        },
    }
}

#[derive(Deserialize)]
struct OllamaResponse {
    message: OllamaMessage,
}
