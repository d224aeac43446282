//! DocuForge CLI — the main entry point.
//!
//! Commands:
//! - `init`      — Write a default config file
//! - `serve`     — Start the HTTP API server
//! - `ingest`    — Add a text file to the knowledge base
//! - `search`    — Query the knowledge base
//! - `generate`  — Draft and review a document for a topic
//! - `doctor`    — Check that the provider and vector store answer

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "docuforge",
    about = "DocuForge — reviewed technical documentation from your knowledge base",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ~/.docuforge/config.toml)
    #[arg(short, long, global = true, env = "DOCUFORGE_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Start the HTTP API server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Ingest a text document into the knowledge base
    Ingest {
        /// Path to the text file
        path: PathBuf,

        /// Source name stored with each chunk (defaults to the file name)
        #[arg(short, long)]
        source: Option<String>,
    },

    /// Search the knowledge base
    Search {
        query: String,

        #[arg(short, long, default_value_t = 3)]
        limit: usize,
    },

    /// Generate a reviewed document for a topic
    Generate { topic: String },

    /// Check that the generation provider and vector store are reachable
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Commands::Init { force } = cli.command {
        init_tracing("info");
        return commands::init::run(cli.config, force).await;
    }

    let config = commands::load_config(cli.config.as_deref())?;
    let level = if cli.verbose {
        "debug"
    } else {
        config.environment.default_log_level()
    };
    init_tracing(level);

    match cli.command {
        Commands::Init { .. } => {}
        Commands::Serve { port } => commands::serve::run(config, port).await?,
        Commands::Ingest { path, source } => commands::ingest::run(config, path, source).await?,
        Commands::Search { query, limit } => commands::search::run(config, query, limit).await?,
        Commands::Generate { topic } => commands::generate::run(config, topic).await?,
        Commands::Doctor => commands::doctor::run(config).await?,
    }

    Ok(())
}

/// Initialize tracing; `RUST_LOG` wins, noisy HTTP internals stay at warn.
fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!("{level},hyper=warn,reqwest=warn"))
            }),
        )
        .with_target(false)
        .init();
}
