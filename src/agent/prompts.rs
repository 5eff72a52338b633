//! System prompt assembly from the prompt directory.
//!
//! `SYSTEM_PROMPT.md` and `SOUL.md` are concatenated in that order,
//! followed by an optional `ME.md` describing the person the assistant
//! works with. When no prompt files exist the built-in minimal prompt
//! is used, so a fresh install answers questions out of the box.

use std::path::Path;

use tracing::debug;

/// Fallback when the prompt directory has no usable files.
const DEFAULT_SYSTEM_PROMPT: &str = "\
You are got, a terse terminal assistant. Answer the user's query \
directly and concisely, in plain text suitable for a terminal. You may \
run read-only shell commands via the run_command tool to inspect the \
local machine, and search the web via the web_search tool for current \
information. Prefer one short answer over many caveats.";

/// Prompt files concatenated in order. Both are optional on disk.
const PROMPT_FILES: &[&str] = &["SYSTEM_PROMPT.md", "SOUL.md"];

/// The optional personal context file.
const ME_FILE: &str = "ME.md";

/// Assembles the system prompt from `prompt_dir`.
pub fn load_system_prompt(prompt_dir: &Path) -> String {
    let mut parts: Vec<String> = Vec::new();

    for name in PROMPT_FILES {
        match std::fs::read_to_string(prompt_dir.join(name)) {
            Ok(text) if !text.trim().is_empty() => parts.push(text.trim().to_string()),
            Ok(_) => debug!("Prompt file {name} is empty, skipping"),
            Err(_) => debug!("Prompt file {name} not found, skipping"),
        }
    }

    if let Ok(me) = std::fs::read_to_string(prompt_dir.join(ME_FILE)) {
        let me = me.trim();
        if !me.is_empty() {
            parts.push(format!("# About the person you work with\n\n{me}"));
        }
    }

    if parts.is_empty() {
        debug!("No prompt files in {}, using built-in prompt", prompt_dir.display());
        return DEFAULT_SYSTEM_PROMPT.to_string();
    }

    parts.join("\n\n")
}
