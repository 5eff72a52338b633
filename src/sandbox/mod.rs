//! Execution sandbox for the `run_command` skill.
//!
//! The security model is layered — both layers must pass before a
//! command string reaches the operating system:
//!
//! 1. Block-pattern scan — structural attack vectors (chaining,
//!    substitution, redirection) and forbidden verbs, matched against
//!    the raw string. First match denies.
//! 2. Allow-list scan — every pipeline segment's program name must be
//!    on the fixed allow-list.
//!
//! Matching is regex/substring based, not a real shell parse. That is
//! deliberate: the gate may over-deny a harmless command that happens
//! to contain a risky token, but it must never under-deny. Anyone
//! replacing this with a proper shell grammar has to keep that
//! fail-closed bias.
//!
//! Admitted commands run through [`ShellExecutor`] with a hard
//! wall-clock timeout and capped output.

mod exec;
mod gate;
mod policy;

pub use exec::ShellExecutor;
pub use gate::{CommandGate, Verdict};
pub use policy::{default_allowed_programs, default_block_rules, BlockRule};
