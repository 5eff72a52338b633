use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Directory holding the config file, the prompt files and the
/// location cache. `~/.got`, falling back to `./.got` when the home
/// directory cannot be resolved.
pub fn got_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".got"))
        .unwrap_or_else(|| PathBuf::from(".got"))
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
    pub agent: AgentConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LlmConfig {
    /// Default model for open-ended queries.
    pub model: String,
    /// Cheaper model selected for functional one-word queries.
    pub fast_model: String,
    /// Supports ${ENV_VAR} substitution
    pub api_key: String,
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-20250514".to_string(),
            fast_model: "claude-3-5-haiku-20241022".to_string(),
            api_key: String::new(),
            max_tokens: 1024,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AgentConfig {
    /// Directory holding SYSTEM_PROMPT.md / SOUL.md / ME.md.
    pub prompt_dir: PathBuf,
    /// Upper bound on tool-use round-trips for one query.
    pub max_tool_iterations: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            prompt_dir: got_dir().join("prompts"),
            max_tool_iterations: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum server-side web searches per query.
    pub max_uses: u8,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { max_uses: 3 }
    }
}

impl Config {
    /// Loads the config from `path`, or full defaults when the file
    /// does not exist (`got` works without any configuration).
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        // Expand environment variables like ${ANTHROPIC_API_KEY}
        let expanded = shellexpand::env(&content)?;
        let config: Config = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// The API key: config value if set, `ANTHROPIC_API_KEY` otherwise.
    pub fn resolved_api_key(&self) -> Option<String> {
        if !self.llm.api_key.is_empty() {
            return Some(self.llm.api_key.clone());
        }
        std::env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.llm.max_tokens, 1024);
        assert_eq!(config.agent.max_tool_iterations, 10);
        assert_eq!(config.search.max_uses, 3);
        assert!(config.llm.model.starts_with("claude-"));
        assert!(config.agent.prompt_dir.ends_with("prompts"));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.llm.max_tokens, 1024);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "[llm]\nmodel = \"claude-test\"\nmax_tokens = 512").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.llm.model, "claude-test");
        assert_eq!(config.llm.max_tokens, 512);
        // Untouched sections keep their defaults
        assert_eq!(config.agent.max_tool_iterations, 10);
        assert_eq!(config.search.max_uses, 3);
    }

    #[test]
    fn test_env_expansion() {
        std::env::set_var("GOT_TEST_KEY", "sk-test");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[llm]\napi_key = \"${GOT_TEST_KEY}\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.llm.api_key, "sk-test");
    }

    #[test]
    fn test_resolved_api_key_prefers_config() {
        let mut config = Config::default();
        config.llm.api_key = "from-config".to_string();
        assert_eq!(config.resolved_api_key().as_deref(), Some("from-config"));
    }
}
