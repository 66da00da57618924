use clap::{Parser, Subcommand};
use handoff_agent::{ClientConfig, OpenAiClient, Orchestrator};
use handoff_core::error::BoxError;
use handoff_core::{ChatMessage, DeveloperContext};
use handoff_tools::{AgentCatalog, Capability, CapabilityRegistry, SCOPE_ENV_VAR};
use serde_json::Value;
use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt, reload};

mod agents;

use agents::{EXIT_KEY, LevelSwitch};

#[derive(Parser, Debug)]
#[command(name = "handoff", version)]
#[command(about = "Handoff CLI - chat with a team of agents that hand conversations to each other")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start an interactive conversation
    Repl {
        /// Module scope to discover agents in (default: $HANDOFF_AGENT_SCOPE, then the demo agents)
        #[arg(long)]
        scope: Option<String>,
    },
    /// List the agents and capabilities of a scope without contacting the model
    Agents {
        #[arg(long)]
        scope: Option<String>,
    },
}

/// Initialize JSON logging with a filter the coordinator can replace.
fn init_logging() -> LevelSwitch {
    let env_filter = EnvFilter::from_default_env();
    let env_filter = match "info".parse() {
        Ok(directive) => env_filter.add_directive(directive),
        Err(_) => env_filter,
    };
    let (filter, handle) = reload::Layer::new(env_filter);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json())
        .try_init();

    Arc::new(move |level: &str| -> Result<(), BoxError> {
        handle.reload(EnvFilter::try_new(level)?)?;
        Ok(())
    })
}

fn resolve_scope(flag: Option<String>) -> String {
    flag.or_else(|| std::env::var(SCOPE_ENV_VAR).ok())
        .filter(|scope| !scope.trim().is_empty())
        .unwrap_or_else(|| agents::SCOPE.to_string())
}

fn build_registry(catalog: &AgentCatalog, scope: &str) -> Result<CapabilityRegistry, BoxError> {
    Ok(CapabilityRegistry::build(catalog, Some(scope))?)
}

/// Lines of the agent listing: each agent with the capabilities it owns,
/// then the static capabilities, which have no owner.
fn agent_listing(registry: &CapabilityRegistry) -> Vec<String> {
    let mut capabilities: Vec<&Capability> = registry
        .agents()
        .iter()
        .flat_map(|agent| registry.capabilities_for(agent))
        .collect();
    capabilities.sort_by(|a, b| a.name().cmp(b.name()));
    capabilities.dedup_by(|a, b| a.name() == b.name());

    let line = |capability: &Capability| format!("  {} {}", capability.name(), capability.parameters());
    let mut lines = Vec::new();
    for agent in registry.agents() {
        let marker = if agent.is_coordinator() { " (coordinator)" } else { "" };
        lines.push(format!("{agent}{marker} [{}]", agent.model()));
        lines.extend(
            capabilities
                .iter()
                .filter(|capability| capability.owner() == Some(agent))
                .map(|&capability| line(capability)),
        );
    }

    let statics: Vec<String> = capabilities
        .iter()
        .filter(|capability| capability.owner().is_none())
        .map(|&capability| line(capability))
        .collect();
    if !statics.is_empty() {
        lines.push("static".to_string());
        lines.extend(statics);
    }
    lines
}

fn list_agents(catalog: &AgentCatalog, scope: &str) -> Result<(), BoxError> {
    let registry = build_registry(catalog, scope)?;
    for line in agent_listing(&registry) {
        println!("{line}");
    }
    Ok(())
}

fn run_repl(catalog: &AgentCatalog, scope: &str) -> Result<(), BoxError> {
    let registry = build_registry(catalog, scope)?;
    let client = OpenAiClient::new(&ClientConfig::from_env()?)?;
    let orchestrator = Orchestrator::new(client, registry);
    let runtime = tokio::runtime::Runtime::new()?;

    tracing::info!(scope = %scope, "Handoff REPL started");

    let mut history: Vec<ChatMessage> = Vec::new();
    let mut developer = DeveloperContext::new();
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("you: ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let prompt = line?;
        if prompt.trim().is_empty() {
            continue;
        }

        match runtime.block_on(orchestrator.run(&prompt, &mut history, &mut developer)) {
            Ok(outcome) => println!("{}: {}", outcome.active_agent, outcome.content()),
            Err(e) => {
                tracing::error!(error = %e, code = e.error_code(), "Conversation turn failed");
                eprintln!("error: {e}");
            }
        }

        if developer.get(EXIT_KEY) == Some(&Value::Bool(true)) {
            break;
        }
    }
    Ok(())
}

fn main() {
    let levels = init_logging();
    let cli = Cli::parse();

    let catalog = match agents::catalog(levels) {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!(error = %e, "Invalid agent catalog");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Repl { scope } => run_repl(&catalog, &resolve_scope(scope)),
        Commands::Agents { scope } => list_agents(&catalog, &resolve_scope(scope)),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Command failed");
        std::process::exit(1);
    }
}
