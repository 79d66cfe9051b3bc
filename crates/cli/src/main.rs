//! Parley CLI — the main entry point.
//!
//! Commands:
//! - `talk`     — Interactive chat or single-message mode
//! - `tools`    — List the registered tools and their schemas
//! - `onboard`  — Initialize config

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "parley",
    about = "Parley — a conversational turn handler with tool pipelines",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Talk to the assistant
    Talk {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,

        /// Print tool calls and results after each turn
        #[arg(long)]
        trace: bool,
    },

    /// List registered tools
    Tools,

    /// Initialize configuration
    Onboard,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Local overrides first; neither file is required.
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Talk { message, trace } => commands::talk::run(message, trace).await?,
        Commands::Tools => commands::tools::run().await?,
        Commands::Onboard => commands::onboard::run().await?,
    }

    Ok(())
}
