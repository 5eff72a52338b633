mod agent;
mod config;
mod llm;
mod sandbox;
mod skills;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::agent::{location, prompts};
use crate::agent::runtime::AgentRuntime;
use crate::config::{got_dir, Config};
use crate::llm::{AnthropicClient, ApiError};
use crate::skills::builtin::RunCommandSkill;
use crate::skills::SkillRegistry;

fn print_help() {
    println!(
        "\
got v{}

A tiny terminal assistant. Ask anything; the model may inspect the
local machine through a guarded read-only shell and search the web.

USAGE:
    got [OPTIONS] <query...>

OPTIONS:
    -h, --help       Print this help message and exit
    -V, --version    Print version and exit

ENVIRONMENT VARIABLES:
    ANTHROPIC_API_KEY    API key for Anthropic Claude models (required)
    RUST_LOG             Log level filter for tracing
                         (e.g. debug, got=debug,warn)

FILES:
    ~/.got/config.toml   Optional configuration (models, token budget)
    ~/.got/prompts/      SYSTEM_PROMPT.md, SOUL.md, optional ME.md

EXAMPLES:
    got weather
    got status
    got \"why is my disk full\"",
        env!("CARGO_PKG_VERSION"),
    );
}

#[tokio::main]
async fn main() {
    // Handle --help / --version before anything else
    let mut query_parts: Vec<String> = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--version" | "-V" => {
                println!("got v{}", env!("CARGO_PKG_VERSION"));
                return;
            }
            "--help" | "-h" => {
                print_help();
                return;
            }
            _ => query_parts.push(arg),
        }
    }

    // Initialize logging (RUST_LOG=debug for debug mode). Default is
    // warnings only so the answer is the only stdout output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("got=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let query = query_parts.join(" ");
    if query.trim().is_empty() {
        println!("Usage: got <anything>");
        println!("Examples: got weather, got status, got pizza, got \"meaning of life\"");
        return;
    }

    match run(&query).await {
        Ok(answer) => {
            if !answer.is_empty() {
                println!("{answer}");
            }
        }
        Err(e) => {
            // Friendly messages for the two most common API failures
            if let Some(api) = e.downcast_ref::<ApiError>() {
                match api.status.as_u16() {
                    401 => println!("Invalid API key."),
                    429 => println!("Rate limited. Try again in a moment."),
                    _ => eprintln!("{api}"),
                }
            } else {
                eprintln!("{e}");
            }
            std::process::exit(1);
        }
    }
}

async fn run(query: &str) -> Result<String> {
    let got_dir = got_dir();
    let mut config = Config::load(&got_dir.join("config.toml"))?;

    let Some(api_key) = config.resolved_api_key() else {
        println!("ANTHROPIC_API_KEY not set.");
        std::process::exit(1);
    };
    config.llm.api_key = api_key;

    info!(
        "Models: {} / {} (fast), prompts: {}",
        config.llm.model,
        config.llm.fast_model,
        config.agent.prompt_dir.display()
    );

    let system_prompt = prompts::load_system_prompt(&config.agent.prompt_dir);

    // Best effort — a failed lookup just means no location hint for
    // the web search tool.
    let location = location::fetch_or_cached(&got_dir).await;

    let llm = AnthropicClient::new(config.llm.clone());
    let mut skills = SkillRegistry::new();
    skills.register(Box::new(RunCommandSkill::new()));
    info!("Skills: {} registered", skills.len());

    let runtime = AgentRuntime::new(config, llm, skills, system_prompt);
    runtime.answer(query, location.as_ref()).await
}
