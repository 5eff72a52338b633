//! Client for the Anthropic Messages API with tool use.
//!
//! Translates the conversation into the Messages wire format and
//! normalizes responses back into [`LlmResponse`]. Two kinds of tools
//! are sent in the `tools[]` array:
//!
//! - custom tools ([`ToolDefinition`]) — executed locally by the
//!   runtime when the response carries `tool_use` blocks,
//! - the server-side web search tool ([`WebSearchTool`]) — executed by
//!   Anthropic; its `server_tool_use` / `web_search_tool_result` blocks
//!   only need to be echoed back on the next iteration.

use std::fmt;

use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::LlmConfig;

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

// ── Shared conversation types ────────────────────────────

/// One message in the conversation.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Message {
    pub role: String,
    pub content: MessageContent,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn assistant_blocks(blocks: Vec<InputContentBlock>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: MessageContent::Blocks(blocks),
        }
    }

    pub fn tool_results(blocks: Vec<InputContentBlock>) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Blocks(blocks),
        }
    }
}

/// Message content: plain text or structured content blocks.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<InputContentBlock>),
}

/// A content block, as sent to and received from the API.
///
/// Server tool blocks (`server_tool_use`, `web_search_tool_result`)
/// are carried opaquely: the loop re-submits them unchanged so the API
/// can correlate its own search calls.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    ToolResult {
        tool_use_id: String,
        content: String,
    },
    ServerToolUse {
        id: String,
        name: String,
        input: Value,
    },
    WebSearchToolResult {
        tool_use_id: String,
        content: Value,
    },
}

/// A custom tool_use call extracted from a response.
#[derive(Debug, Clone)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub input: Value,
}

/// Why the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    ToolUse,
    MaxTokens,
    Other(String),
}

/// Normalized LLM response.
#[derive(Debug)]
pub struct LlmResponse {
    /// Concatenated text blocks.
    pub text: String,
    /// Custom tool calls to execute locally (server tool calls excluded).
    pub tool_calls: Vec<ToolCall>,
    pub stop_reason: StopReason,
    /// The full response content, for re-submission in the agentic loop.
    pub content_blocks: Vec<InputContentBlock>,
    pub input_tokens: u32,
    pub output_tokens: u32,
}

// ── Tool definitions ─────────────────────────────────────

/// A custom tool exposed to the model.
#[derive(Debug, Serialize, Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// The Anthropic server-side web search tool.
#[derive(Debug, Serialize, Clone)]
pub struct WebSearchTool {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub name: String,
    pub max_uses: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_location: Option<UserLocation>,
}

impl WebSearchTool {
    pub fn new(max_uses: u8, user_location: Option<UserLocation>) -> Self {
        Self {
            tool_type: "web_search_20250305".to_string(),
            name: "web_search".to_string(),
            max_uses,
            user_location,
        }
    }
}

/// Approximate user location hint for the web search tool.
#[derive(Debug, Serialize, Clone)]
pub struct UserLocation {
    #[serde(rename = "type")]
    pub location_type: String,
    pub city: String,
    pub region: String,
    pub country: String,
    pub timezone: String,
}

/// One entry of the `tools[]` array.
#[derive(Debug, Serialize, Clone)]
#[serde(untagged)]
pub enum Tool {
    Custom(ToolDefinition),
    WebSearch(WebSearchTool),
}

impl Tool {
    /// The tool name, for logging.
    pub fn name(&self) -> &str {
        match self {
            Tool::Custom(def) => &def.name,
            Tool::WebSearch(ws) => &ws.name,
        }
    }
}

// ── Wire types ───────────────────────────────────────────

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [Tool]>,
    messages: &'a [Message],
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<InputContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

// ── Errors ───────────────────────────────────────────────

/// Non-success response from the API. Carried inside the anyhow chain
/// so the top level can map 401/429 to friendly messages.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Claude API error ({}): {}", self.status, self.body)
    }
}

impl std::error::Error for ApiError {}

// ── AnthropicClient ──────────────────────────────────────

/// Client for the Anthropic Messages API.
pub struct AnthropicClient {
    client: Client,
    config: LlmConfig,
}

impl AnthropicClient {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Sends a conversation to the LLM and returns the response.
    ///
    /// `model` is passed per call so the router can pick a different
    /// model per query without rebuilding the client.
    pub async fn complete(
        &self,
        model: &str,
        system_prompt: &str,
        messages: &[Message],
        tools: Option<&[Tool]>,
    ) -> Result<LlmResponse> {
        let request = MessagesRequest {
            model,
            max_tokens: self.config.max_tokens,
            system: system_prompt,
            tools,
            messages,
        };

        debug!(
            "Calling Claude API ({model}) with {} messages{}",
            messages.len(),
            if tools.is_some() { " + tools" } else { "" }
        );

        let response = self
            .client
            .post(API_URL)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError { status, body }.into());
        }

        let resp: MessagesResponse = response.json().await?;
        Ok(normalize_response(resp))
    }
}

/// Normalizes a wire response into [`LlmResponse`].
fn normalize_response(resp: MessagesResponse) -> LlmResponse {
    let text = resp
        .content
        .iter()
        .filter_map(|block| match block {
            InputContentBlock::Text { text } => Some(text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("");

    let tool_calls: Vec<ToolCall> = resp
        .content
        .iter()
        .filter_map(|block| match block {
            InputContentBlock::ToolUse { id, name, input } => Some(ToolCall {
                id: id.clone(),
                name: name.clone(),
                input: input.clone(),
            }),
            _ => None,
        })
        .collect();

    let stop_reason = match resp.stop_reason.as_deref() {
        Some("end_turn") | None => StopReason::EndTurn,
        Some("tool_use") => StopReason::ToolUse,
        Some("max_tokens") => StopReason::MaxTokens,
        Some(other) => StopReason::Other(other.to_string()),
    };

    let (input_tokens, output_tokens) = resp
        .usage
        .map(|u| (u.input_tokens, u.output_tokens))
        .unwrap_or((0, 0));

    info!("LLM response: {input_tokens} in / {output_tokens} out tokens");

    LlmResponse {
        text,
        tool_calls,
        stop_reason,
        content_blocks: resp.content,
        input_tokens,
        output_tokens,
    }
}
