//! Skill registry: the set of local tools exposed to the LLM.

use crate::llm::ToolDefinition;

use super::{tool_definition, Skill};

/// Holds the registered skills and resolves tool_use calls by name.
pub struct SkillRegistry {
    skills: Vec<Box<dyn Skill>>,
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self { skills: Vec::new() }
    }

    pub fn register(&mut self, skill: Box<dyn Skill>) {
        self.skills.push(skill);
    }

    /// Looks up a skill by its tool name.
    pub fn get(&self, name: &str) -> Option<&dyn Skill> {
        self.skills
            .iter()
            .find(|s| s.name() == name)
            .map(|s| s.as_ref())
    }

    /// Tool definitions for the Anthropic `tools[]` array, in
    /// registration order.
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.skills.iter().map(|s| tool_definition(s.as_ref())).collect()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

impl Default for SkillRegistry {
    fn default() -> Self {
        Self::new()
    }
}
