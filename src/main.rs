//! urban-tools CLI - list, describe and call catalog tools.
//!
//! Commands:
//! - list: tool names, kinds and descriptions
//! - describe: the tool-selection prompt text
//! - call: execute one tool and print its result as JSON

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use urban_tools::{ApiExecutor, Arguments, Config, ToolCatalog, ToolRegistry};

#[derive(Debug, Parser)]
#[command(name = "urban-tools", version, about = "Execute tools from a declarative catalog")]
struct Cli {
    /// Tool catalog (JSON with api_tools / mcp_tools / code_tools).
    #[arg(long, env = "URBAN_TOOLS_CATALOG", default_value = "./urban_tools.json", global = true)]
    catalog: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List registered tools.
    List,
    /// Print the tool descriptions used for tool selection.
    Describe,
    /// Execute a tool.
    Call {
        /// Tool name.
        tool: String,
        /// Arguments as a JSON object.
        #[arg(long, default_value = "{}")]
        args: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    match dotenvy::dotenv() {
        Ok(path) => eprintln!("loaded environment from {}", path.display()),
        Err(err) if err.not_found() => {}
        Err(err) => eprintln!("ignoring .env: {err}"),
    }

    let cli = Cli::parse();
    let config = Config::from_env();
    urban_tools::observability::init_tracing_with(&config.observability);

    let catalog = ToolCatalog::load(&cli.catalog)?;
    for problem in catalog.validate() {
        tracing::warn!("catalog: {}", problem);
    }

    let registry = ToolRegistry::new(catalog, ApiExecutor::new(&config.executor)?);
    tracing::info!(tools = registry.len(), catalog = %cli.catalog.display(), "tool pool loaded");

    match cli.command {
        Command::List => {
            for tool in registry.list_tools() {
                println!("{:<28} {:<5} {}", tool.name, tool.kind, tool.description);
            }
        }
        Command::Describe => println!("{}", registry.tools_description()),
        Command::Call { tool, args } => {
            let arguments: Arguments = serde_json::from_str(&args)
                .map_err(|e| format!("--args must be a JSON object: {e}"))?;
            let result = registry.execute(&tool, &arguments).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
