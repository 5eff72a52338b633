//! Bounded execution of admitted commands.
//!
//! Runs the command through `sh -c` with the caller's working directory
//! and environment, a hard wall-clock timeout, and capped output. Every
//! outcome resolves to a string for the LLM: captured stdout on
//! success, a trimmed error message on failure, and an empty string for
//! "command not found"-class failures so an automated caller sees "no
//! output" rather than OS noise.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

/// Hard wall-clock timeout for one command.
const CMD_TIMEOUT: Duration = Duration::from_secs(5);

/// Maximum characters of captured stdout returned on success.
const MAX_OUTPUT_CHARS: usize = 4000;

/// Maximum characters of error text returned on failure.
const MAX_ERROR_CHARS: usize = 1000;

/// Failure texts that are downgraded to an empty result instead of
/// being surfaced to the LLM.
const SILENCED_FAILURES: &[&str] = &[
    "command not found",
    ": not found",
    "illegal option",
    "invalid option",
    "unrecognized option",
];

/// Runs admitted commands with a bounded timeout and output size.
///
/// Only reachable through the gate: callers must hold an `Admitted`
/// verdict for the command before invoking [`run`](Self::run).
pub struct ShellExecutor {
    timeout: Duration,
}

impl ShellExecutor {
    pub fn new() -> Self {
        Self {
            timeout: CMD_TIMEOUT,
        }
    }

    /// Executor with a custom timeout. Used by tests.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Executes `command` and returns the result as a string.
    ///
    /// Never returns an error: failures are normalized into the result
    /// text so the caller can hand it to the LLM verbatim.
    pub async fn run(&self, command: &str) -> String {
        debug!("Executing: {command}");

        let child = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Dropping the wait future on timeout must not leave the
            // subprocess running.
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(child) => child,
            Err(e) => {
                warn!("Failed to spawn shell: {e}");
                return normalize_failure(&e.to_string());
            }
        };

        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                if output.status.success() {
                    let stdout = String::from_utf8_lossy(&output.stdout);
                    truncate(stdout.trim(), MAX_OUTPUT_CHARS)
                } else {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    let text = if stderr.trim().is_empty() {
                        format!("Command failed with {}", output.status)
                    } else {
                        stderr.trim().to_string()
                    };
                    debug!("Command failed ({}): {text}", output.status);
                    normalize_failure(&text)
                }
            }
            Ok(Err(e)) => {
                warn!("Command I/O error: {e}");
                normalize_failure(&e.to_string())
            }
            Err(_) => {
                warn!("Command timed out after {}s: {command}", self.timeout.as_secs());
                truncate(
                    &format!("Command timed out after {}s", self.timeout.as_secs()),
                    MAX_ERROR_CHARS,
                )
            }
        }
    }
}

impl Default for ShellExecutor {
    fn default() -> Self {
        Self::new()
    }
}

/// Truncates `text` to at most `max` characters (not bytes, so the cut
/// never lands inside a UTF-8 sequence).
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        text.chars().take(max).collect()
    } else {
        text.to_string()
    }
}

/// Normalizes failure text: "program does not exist" and
/// "option unsupported" failures become an empty result, everything
/// else is trimmed and truncated verbatim.
fn normalize_failure(text: &str) -> String {
    let lower = text.to_lowercase();
    if SILENCED_FAILURES.iter().any(|marker| lower.contains(marker)) {
        return String::new();
    }
    truncate(text.trim(), MAX_ERROR_CHARS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simple_command_output() {
        let executor = ShellExecutor::new();
        assert_eq!(executor.run("echo hello").await, "hello");
    }

    #[tokio::test]
    async fn test_pipeline_output() {
        let executor = ShellExecutor::new();
        let output = executor.run("printf 'a\\nb\\nc\\n' | wc -l").await;
        assert_eq!(output.trim(), "3");
    }

    #[tokio::test]
    async fn test_output_is_trimmed() {
        let executor = ShellExecutor::new();
        // echo appends a trailing newline; run() trims it.
        assert_eq!(executor.run("echo '  spaced  '").await, "spaced");
    }

    #[tokio::test]
    async fn test_output_truncated_to_budget() {
        let executor = ShellExecutor::new();
        let output = executor.run("seq 1 3000").await;
        assert_eq!(output.chars().count(), MAX_OUTPUT_CHARS);
    }

    #[tokio::test]
    async fn test_nonzero_exit_returns_stderr() {
        let executor = ShellExecutor::new();
        let output = executor.run("cat /definitely/not/a/real/path").await;
        assert!(
            output.contains("No such file"),
            "stderr should pass through: {output:?}"
        );
        assert!(output.chars().count() <= MAX_ERROR_CHARS);
    }

    #[tokio::test]
    async fn test_missing_program_silenced() {
        let executor = ShellExecutor::new();
        // The shell reports "not found"; that class of failure is
        // downgraded to empty output.
        let output = executor.run("got-no-such-program-xyz").await;
        assert_eq!(output, "");
    }

    #[tokio::test]
    async fn test_timeout_kills_and_reports() {
        let executor = ShellExecutor::with_timeout(Duration::from_millis(200));
        let output = executor.run("sleep 30").await;
        assert!(!output.is_empty());
        assert!(output.contains("timed out"), "{output:?}");
        assert!(output.chars().count() <= MAX_ERROR_CHARS);
    }

    #[tokio::test]
    async fn test_failure_with_empty_stderr() {
        let executor = ShellExecutor::new();
        // `sh -c 'exit 3'` produces no stderr; a synthetic message is
        // returned instead of an empty string.
        let output = executor.run("exit 3").await;
        assert!(output.contains("Command failed"), "{output:?}");
    }

    // ── helpers ──────────────────────────────────────────

    #[test]
    fn test_truncate_char_boundary() {
        // 3 multi-byte chars, budget of 2 — must not split a char.
        assert_eq!(truncate("ééé", 2), "éé");
        assert_eq!(truncate("abc", 5), "abc");
    }

    #[test]
    fn test_normalize_failure_silences_not_found() {
        assert_eq!(normalize_failure("sh: 1: foo: not found"), "");
        assert_eq!(normalize_failure("bash: foo: command not found"), "");
        assert_eq!(normalize_failure("ls: illegal option -- z"), "");
        assert_eq!(normalize_failure("ls: invalid option -- 'z'"), "");
    }

    #[test]
    fn test_normalize_failure_passes_real_errors() {
        let text = "cat: /etc/shadow: Permission denied";
        assert_eq!(normalize_failure(text), text);
    }
}
