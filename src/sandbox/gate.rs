//! The command admission gate.
//!
//! `evaluate()` is a pure function of the candidate string and the
//! policy held by the gate: no I/O, no hidden state, same verdict for
//! the same input every time. A command string must never reach
//! [`super::ShellExecutor`] without an `Admitted` verdict, and a
//! denial is final for that invocation — there is no retry path.

use std::collections::HashSet;

use super::policy::{default_allowed_programs, default_block_rules, BlockRule};

/// The admission decision for one candidate command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Admitted,
    Denied { reason: String },
}

impl Verdict {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Verdict::Admitted)
    }
}

/// Layered allow-list/block-list gate over candidate command strings.
///
/// The candidate comes from the LLM and is fully untrusted. Two checks
/// run in order:
///
/// 1. every block rule is tested against the raw string; the first
///    match denies with that rule's label,
/// 2. the string is split on `|` and each segment's program name must
///    be on the allow-list.
///
/// Pattern-blocking catches structural vectors (chaining, substitution,
/// redirection) regardless of which program is named; allow-listing
/// catches unknown programs regardless of structure. Neither check
/// alone is sufficient.
pub struct CommandGate {
    allowed: HashSet<&'static str>,
    rules: Vec<BlockRule>,
}

impl CommandGate {
    /// Gate with the default policy from [`super::policy`].
    pub fn new() -> Self {
        Self::with_policy(default_allowed_programs(), default_block_rules())
    }

    /// Gate with an explicit policy. Used by tests to exercise the
    /// algorithm with custom allow/block sets.
    pub fn with_policy(
        allowed: impl IntoIterator<Item = &'static str>,
        rules: Vec<BlockRule>,
    ) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
            rules,
        }
    }

    /// Decides whether `candidate` may be executed.
    pub fn evaluate(&self, candidate: &str) -> Verdict {
        // Layer 1: block patterns, in order, against the raw string.
        for rule in &self.rules {
            if rule.pattern.is_match(candidate) {
                return Verdict::Denied {
                    reason: format!("blocked pattern: {}", rule.label),
                };
            }
        }

        // Layer 2: every pipeline segment's program must be allow-listed.
        // Empty segments (leading/trailing/double pipes, whitespace-only
        // input) yield an empty program name, which matches nothing.
        for segment in candidate.split('|') {
            let program = segment.split_whitespace().next().unwrap_or("");
            if !self.allowed.contains(program) {
                return Verdict::Denied {
                    reason: format!("program not allowed: {program}"),
                };
            }
        }

        Verdict::Admitted
    }
}

impl Default for CommandGate {
    fn default() -> Self {
        Self::new()
    }
}
