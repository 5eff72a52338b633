//! Builtin skill: run a read-only shell command on the local machine.
//!
//! Every candidate goes through the [`CommandGate`] first; only
//! admitted commands reach the [`ShellExecutor`]. Denials come back as
//! a `BLOCKED: …` tool result rather than an error, so the LLM can
//! read the reason and try something else (or give up gracefully).

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::sandbox::{CommandGate, ShellExecutor, Verdict};
use crate::skills::Skill;

/// Builtin skill exposing a guarded local shell to the LLM.
pub struct RunCommandSkill {
    gate: CommandGate,
    executor: ShellExecutor,
}

impl RunCommandSkill {
    pub fn new() -> Self {
        Self {
            gate: CommandGate::new(),
            executor: ShellExecutor::new(),
        }
    }
}

impl Default for RunCommandSkill {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Skill for RunCommandSkill {
    fn name(&self) -> &str {
        "run_command"
    }

    fn description(&self) -> &str {
        "Run a read-only shell command on the local machine. \
         Allowed: ls, cat, head, tail, find, grep, git, ps, df, du, uptime, \
         uname, date, etc. Pipes between allowed commands are fine. \
         No writes, no redirects, no sudo, no curl. \
         The working directory is wherever the user invoked got."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "The shell command to run"
                }
            },
            "required": ["command"]
        })
    }

    async fn execute(&self, params: Value) -> anyhow::Result<String> {
        let command = params["command"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing required parameter: command"))?;

        match self.gate.evaluate(command) {
            Verdict::Denied { reason } => {
                warn!("Command denied ({reason}): {command}");
                Ok(format!("BLOCKED: {reason}"))
            }
            Verdict::Admitted => {
                debug!("Command admitted: {command}");
                Ok(self.executor.run(command).await)
            }
        }
    }
}
