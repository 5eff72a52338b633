pub mod builtin;
pub mod registry;

use async_trait::async_trait;

use crate::llm::ToolDefinition;

/// A skill that the LLM can invoke via tool_use.
///
/// The runtime calls `execute()` when the LLM requests a tool_use
/// with the skill's name.
#[async_trait]
pub trait Skill: Send + Sync {
    /// Unique identifier used in the Anthropic `tools[]` array.
    /// Must be lowercase alphanumeric + underscores (e.g. "run_command").
    fn name(&self) -> &str;

    /// Human-readable description shown to the LLM so it knows
    /// when to invoke this skill.
    fn description(&self) -> &str;

    /// JSON Schema describing the parameters this skill accepts.
    /// Used as the `input_schema` field in the Anthropic tool definition.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the skill with the given parameters and return a text result.
    /// The returned string is sent back to the LLM as a `tool_result`.
    async fn execute(&self, params: serde_json::Value) -> anyhow::Result<String>;
}

/// Builds the Anthropic tool definition for a skill.
pub fn tool_definition(skill: &dyn Skill) -> ToolDefinition {
    ToolDefinition {
        name: skill.name().to_string(),
        description: skill.description().to_string(),
        input_schema: skill.parameters_schema(),
    }
}

pub use registry::SkillRegistry;
