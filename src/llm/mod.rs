pub mod anthropic;

pub use anthropic::{
    AnthropicClient, ApiError, InputContentBlock, LlmResponse, Message, MessageContent,
    StopReason, Tool, ToolCall, ToolDefinition, UserLocation, WebSearchTool,
};
