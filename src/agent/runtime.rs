//! The agentic runtime — core of got.
//!
//! Takes one user query, runs the tool-use loop against the LLM
//! (executing local skills when requested), and returns the final text
//! answer.

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::agent::location::Location;
use crate::agent::router;
use crate::config::Config;
use crate::llm::{
    AnthropicClient, InputContentBlock, Message, StopReason, Tool, ToolCall, WebSearchTool,
};
use crate::skills::SkillRegistry;

pub struct AgentRuntime {
    config: Config,
    llm: AnthropicClient,
    skills: SkillRegistry,
    system_prompt: String,
}

impl AgentRuntime {
    pub fn new(
        config: Config,
        llm: AnthropicClient,
        skills: SkillRegistry,
        system_prompt: String,
    ) -> Self {
        Self {
            config,
            llm,
            skills,
            system_prompt,
        }
    }

    /// Answers one query, driving the tool-use loop to completion.
    ///
    /// The loop runs while the model stops for custom tool use, up to
    /// `max_tool_iterations` round-trips. Server-side web search is
    /// handled by the API within a single round-trip and does not
    /// consume an iteration here.
    pub async fn answer(&self, query: &str, location: Option<&Location>) -> Result<String> {
        let model = router::select_model(&self.config.llm, query);
        let tools = self.build_tools(location);

        debug!(
            "Query with model {model}, tools: {}",
            tools.iter().map(Tool::name).collect::<Vec<_>>().join(", ")
        );

        let mut messages = vec![Message::user(query)];
        let mut final_text = String::new();
        let mut total_tokens = 0;

        for iteration in 1..=self.config.agent.max_tool_iterations {
            let response = self
                .llm
                .complete(model, &self.system_prompt, &messages, Some(&tools))
                .await?;

            total_tokens += response.input_tokens + response.output_tokens;
            final_text = response.text;

            // Only loop when the model wants custom tools executed.
            if response.stop_reason != StopReason::ToolUse || response.tool_calls.is_empty() {
                break;
            }

            info!(
                "Iteration {iteration}: {} tool call(s)",
                response.tool_calls.len()
            );

            // Re-submit the assistant's full content (including any
            // server tool blocks), then append our tool results.
            messages.push(Message::assistant_blocks(response.content_blocks));

            let mut results = Vec::with_capacity(response.tool_calls.len());
            for call in &response.tool_calls {
                let result = self.execute_tool(call).await;
                results.push(InputContentBlock::ToolResult {
                    tool_use_id: call.id.clone(),
                    content: result,
                });
            }
            messages.push(Message::tool_results(results));
        }

        info!(
            "Answer: {} chars ({total_tokens} tokens used)",
            final_text.len()
        );

        Ok(final_text.trim().to_string())
    }

    /// The `tools[]` array: server-side web search first, then the
    /// registered local skills.
    fn build_tools(&self, location: Option<&Location>) -> Vec<Tool> {
        let hint = location.and_then(Location::user_location_hint);
        let mut tools = vec![Tool::WebSearch(WebSearchTool::new(
            self.config.search.max_uses,
            hint,
        ))];
        tools.extend(self.skills.tool_definitions().into_iter().map(Tool::Custom));
        tools
    }

    /// Executes one custom tool call. Failures become result text so
    /// the model sees what went wrong instead of the query aborting.
    async fn execute_tool(&self, call: &ToolCall) -> String {
        debug!("Tool execution: {} {}", call.name, call.input);

        match self.skills.get(&call.name) {
            Some(skill) => match skill.execute(call.input.clone()).await {
                Ok(result) => result,
                Err(e) => {
                    warn!("Skill {} failed: {e}", call.name);
                    format!("Tool error: {e}")
                }
            },
            None => {
                warn!("Unknown tool requested: {}", call.name);
                format!("Unknown tool: {}", call.name)
            }
        }
    }
}
