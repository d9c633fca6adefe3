use anyhow::Context;
use chrono::{Datelike, Local};
use std::io;
use tracing::info;

mod agent;
mod config;
mod llm_client;
mod repl;
mod session;
mod tool_registry;
mod tools;
mod types;
mod utils;

#[cfg(test)]
mod mocks;
#[cfg(test)]
mod tests;

use crate::agent::Agent;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::session::{Session, system_prompt};
use crate::tool_registry::ToolRegistry;
use crate::tools::DataResolver;
use crate::types::Message;

#[tokio::main]
async fn main() {
    // stdout is the conversation; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let llm = LlmClient::new(&config).context("Failed to build HTTP client")?;
    let tools = ToolRegistry::new()?;
    let resolver = DataResolver::new(config.data_dir.clone());
    info!(
        deployment = %config.deployment,
        data_dir = %config.data_dir.display(),
        tools = tools.declarations().count(),
        "starting AnalitiChAT"
    );

    let agent = Agent::new(Box::new(llm), tools, resolver);
    let mut session = Session::new(Message::system(system_prompt(Local::now().year())));

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    repl::run(&agent, &mut session, stdin.lock(), &mut stdout).await
}
