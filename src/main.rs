//! codeask - ask questions about your codebase
//!
//! Scans a project into a compact outline, sends it with your question to a
//! Dify chat app, and can apply the file edits the answer proposes.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod ai;
mod cli;
mod config;
mod edits;
mod project;
mod session;

/// codeask - ask questions about your codebase
#[derive(Parser)]
#[command(name = "codeask")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Ask natural-language questions about your codebase", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CODEASK_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the project and show its structure
    Analyze {
        /// Project root (defaults to current directory)
        path: Option<String>,

        /// Print the scanned tree as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the query that would be sent, without sending it
    Context {
        /// Project root (defaults to current directory)
        path: Option<String>,

        /// File currently being worked on
        #[arg(short, long)]
        file: Option<String>,

        /// Question to embed in the query
        #[arg(short, long, default_value = "")]
        question: String,
    },

    /// Ask a question about your codebase
    Ask {
        /// The question to ask
        question: String,

        /// Project root (defaults to current directory)
        #[arg(short, long)]
        path: Option<String>,

        /// File currently being worked on
        #[arg(short, long)]
        file: Option<String>,

        /// Continue an existing conversation
        #[arg(long)]
        conversation: Option<String>,

        /// Write the file edits proposed in the answer
        #[arg(long)]
        apply: bool,

        /// Do not ask before writing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Start an interactive session
    Chat {
        /// Project root (defaults to current directory)
        #[arg(short, long)]
        path: Option<String>,

        /// File currently being worked on
        #[arg(short, long)]
        file: Option<String>,
    },

    /// Show configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Initialize configuration file
        #[arg(long)]
        init: bool,
    },

    /// Show version and system info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays pipeable
    let level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = config::load_config(cli.config.as_deref())?;
    config.verbose = cli.verbose;

    debug!("codeask v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(Commands::Analyze { path, json }) => {
            cli::analyze::run(&config, path.as_deref(), json).await?;
        }
        Some(Commands::Context { path, file, question }) => {
            cli::context::run(&config, path.as_deref(), file.as_deref(), &question).await?;
        }
        Some(Commands::Ask {
            question,
            path,
            file,
            conversation,
            apply,
            yes,
        }) => {
            let options = cli::ask::AskOptions {
                path,
                file,
                conversation,
                apply,
                assume_yes: yes,
            };
            cli::ask::run(&config, &question, options).await?;
        }
        Some(Commands::Chat { path, file }) => {
            cli::chat::run(&config, path.as_deref(), file.as_deref()).await?;
        }
        Some(Commands::Config { show, init }) => {
            if init {
                config::init_config(cli.config.as_deref())?;
            } else if show {
                config::show_config(&config)?;
            }
        }
        Some(Commands::Info) => {
            cli::info::run(&config)?;
        }
        None => {
            // Default: Start interactive chat
            cli::chat::run(&config, None, None).await?;
        }
    }

    Ok(())
}
