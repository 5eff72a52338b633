pub mod location;
pub mod prompts;
pub mod router;
pub mod runtime;
