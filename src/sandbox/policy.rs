//! Default admission policy: the allow-list and the block rules.
//!
//! Both sets are fixed at startup and never mutated at runtime. They
//! are exposed as functions (rather than process-wide statics) so the
//! gate can be constructed with a custom policy in tests.

use regex::Regex;

/// Program names permitted to run as a pipeline segment.
///
/// Case-sensitive exact match against the first whitespace-delimited
/// token of each segment.
const ALLOWED_PROGRAMS: &[&str] = &[
    // system info
    "uname", "hostname", "uptime", "whoami", "date", "id", "arch",
    "sw_vers", "system_profiler", "sysctl", "nproc", "lsb_release",
    // files (read-only)
    "ls", "cat", "head", "tail", "find", "file", "wc", "stat",
    "du", "df", "tree", "realpath", "basename", "dirname",
    // processes
    "ps", "pgrep", "lsof", "vm_stat", "free", "top",
    // network (read-only)
    "ping", "dig", "nslookup", "ifconfig", "ip", "host", "networksetup",
    // git — read operations only; mutating subcommands are block-ruled
    "git",
    // text processing
    "grep", "awk", "sed", "sort", "uniq", "cut", "tr", "jq", "xargs",
    // introspection
    "which", "type", "echo", "printenv", "env", "locale", "pwd",
    // language version checks
    "node", "npm", "python", "python3", "ruby", "java", "rustc", "cargo",
];

/// A single block rule: a regex over the raw command string and the
/// human-readable label used as the denial reason.
#[derive(Debug, Clone)]
pub struct BlockRule {
    pub label: &'static str,
    pub pattern: Regex,
}

impl BlockRule {
    fn new(label: &'static str, pattern: &str) -> Self {
        Self {
            label,
            // Patterns are compile-time literals, verified by tests.
            pattern: Regex::new(pattern).expect("block pattern must compile"),
        }
    }
}

/// Returns the default allow-list.
pub fn default_allowed_programs() -> Vec<&'static str> {
    ALLOWED_PROGRAMS.to_vec()
}

/// Returns the default block rules, in evaluation order.
///
/// The first matching rule denies the command with its label; later
/// rules are not evaluated.
pub fn default_block_rules() -> Vec<BlockRule> {
    vec![
        // Statement separators / chaining
        BlockRule::new("statement chaining ';'", r";"),
        BlockRule::new("conditional chaining '&&'", r"&&"),
        BlockRule::new("or-chaining '||'", r"\|\|"),
        // Substitution / injection vectors
        BlockRule::new("backtick substitution", r"`"),
        BlockRule::new("command substitution '$('", r"\$\("),
        BlockRule::new("embedded newline", r"[\r\n]"),
        // Redirection (covers > and >>)
        BlockRule::new("output redirection '>'", r">"),
        // Privilege escalation and filesystem mutation
        BlockRule::new("sudo", r"\bsudo\b"),
        BlockRule::new("rm", r"\brm\s"),
        BlockRule::new("mv", r"\bmv\s"),
        BlockRule::new("cp", r"\bcp\s"),
        BlockRule::new("dd", r"\bdd\s"),
        BlockRule::new("mkdir", r"\bmkdir\b"),
        BlockRule::new("touch", r"\btouch\b"),
        BlockRule::new("chmod", r"\bchmod\b"),
        BlockRule::new("chown", r"\bchown\b"),
        // Process control
        BlockRule::new("kill", r"\bkill\b"),
        BlockRule::new("pkill", r"\bpkill\b"),
        BlockRule::new("reboot", r"\breboot\b"),
        BlockRule::new("shutdown", r"\bshutdown\b"),
        // Outbound network fetchers — web access goes through web_search
        BlockRule::new("curl", r"\bcurl\b"),
        BlockRule::new("wget", r"\bwget\b"),
        // sed -i is a write disguised as a text filter
        BlockRule::new("in-place sed edit", r"\bsed\b[^|]*\s-i"),
        // git is allow-listed, but only for read operations
        BlockRule::new(
            "mutating git subcommand",
            r"\bgit\s+(push|commit|reset|clean|rebase|merge)\b",
        ),
        BlockRule::new("forced git checkout", r"\bgit\s+checkout\b[^|]*(\s-f\b|--force)"),
        BlockRule::new("destructive git stash", r"\bgit\s+stash\s+(drop|pop|clear)\b"),
        // Interpreter one-liners are a generic code-execution escape hatch
        BlockRule::new(
            "interpreter eval flag",
            r"\b(sh|bash|zsh|python3?|node|ruby|perl)\b[^|]*\s-[ec]\b",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every default pattern must compile (BlockRule::new panics otherwise).
    #[test]
    fn test_default_rules_compile() {
        let rules = default_block_rules();
        assert!(!rules.is_empty());
    }

    #[test]
    fn test_rule_labels_nonempty() {
        let rules = default_block_rules();
        for rule in &rules {
            assert!(!rule.label.is_empty());
        }
    }

    #[test]
    fn test_allow_list_contains_basics() {
        let allowed = default_allowed_programs();
        for program in ["ls", "cat", "grep", "git", "wc"] {
            assert!(allowed.contains(&program), "{program} should be allowed");
        }
    }

    #[test]
    fn test_allow_list_excludes_shells() {
        let allowed = default_allowed_programs();
        for program in ["sh", "bash", "zsh", "curl", "rm"] {
            assert!(!allowed.contains(&program), "{program} must not be allowed");
        }
    }

    // ── Individual pattern behavior ──────────────────────

    fn first_match(cmd: &str) -> Option<&'static str> {
        default_block_rules()
            .iter()
            .find(|r| r.pattern.is_match(cmd))
            .map(|r| r.label)
    }

    #[test]
    fn test_sed_in_place_matches() {
        assert_eq!(first_match("sed -i 's/a/b/' file"), Some("in-place sed edit"));
        assert_eq!(first_match("sed -i.bak 's/a/b/' file"), Some("in-place sed edit"));
    }

    #[test]
    fn test_sed_read_only_passes() {
        assert_eq!(first_match("sed 's/a/b/' file"), None);
        assert_eq!(first_match("sed -n 5p file"), None);
    }

    #[test]
    fn test_git_mutating_verbs_match() {
        assert_eq!(
            first_match("git push origin main"),
            Some("mutating git subcommand")
        );
        assert_eq!(
            first_match("git commit -m msg"),
            Some("mutating git subcommand")
        );
        assert_eq!(first_match("git stash drop"), Some("destructive git stash"));
        assert_eq!(
            first_match("git checkout --force main"),
            Some("forced git checkout")
        );
    }

    #[test]
    fn test_git_read_verbs_pass() {
        assert_eq!(first_match("git status"), None);
        assert_eq!(first_match("git log --oneline"), None);
        assert_eq!(first_match("git checkout main"), None);
        assert_eq!(first_match("git stash list"), None);
    }

    #[test]
    fn test_interpreter_eval_flags_match() {
        assert_eq!(
            first_match("python3 -c 'import os'"),
            Some("interpreter eval flag")
        );
        assert_eq!(first_match("node -e 'fs'"), Some("interpreter eval flag"));
    }

    #[test]
    fn test_interpreter_version_checks_pass() {
        assert_eq!(first_match("python3 --version"), None);
        assert_eq!(first_match("node --version"), None);
    }

    #[test]
    fn test_whole_word_matching() {
        // "format" contains "rm", "mkdirs" contains "mkdir" — neither is
        // a whole-word match.
        assert_eq!(first_match("grep format notes.txt"), None);
        assert_eq!(first_match("echo mkdirs"), None);
    }
}
