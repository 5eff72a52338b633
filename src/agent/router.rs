//! Model selection heuristic.
//!
//! A small whitelist of "functional" one-word queries — things like
//! `got status` or `got weather` where the answer is a quick lookup —
//! routes to the cheaper fast model. Everything else gets the default
//! model.

use crate::config::LlmConfig;

/// One-word queries answered with the fast model.
const FUNCTIONAL_QUERIES: &[&str] = &[
    "status", "weather", "time", "date", "uptime", "ip", "disk", "mem",
];

/// Picks the model for a query.
pub fn select_model<'a>(llm: &'a LlmConfig, query: &str) -> &'a str {
    let normalized = query.trim().to_lowercase();
    if FUNCTIONAL_QUERIES.contains(&normalized.as_str()) {
        &llm.fast_model
    } else {
        &llm.model
    }
}
