//! Taleweave CLI, the main entry point.
//!
//! Commands:
//! - `init`      Write a default config file
//! - `run`       Digest, translate and illustrate one document
//! - `show`      Print a stored digest
//! - `recent`    List the newest digests
//! - `search`    Find digests by title
//! - `evaluate`  Score generated digests against reference corpora
//! - `doctor`    Diagnose configuration and storage

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "taleweave",
    about = "Taleweave: illustrated fairy-tale digests and digest evaluation",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file to use instead of the default locations
    #[arg(short, long, global = true, env = "TALEWEAVE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Digest one document: summarize, translate, illustrate, store
    Run {
        /// Inline narrative text
        #[arg(short, long, conflicts_with = "file")]
        text: Option<String>,

        /// A `.txt` file to digest
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Title for inline text (defaults to `pipeline.inline_title`)
        #[arg(long, requires = "text")]
        title: Option<String>,
    },

    /// Print one stored digest
    Show {
        /// Row id
        id: i64,
    },

    /// List the most recent digests
    Recent {
        /// Number of rows to list
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },

    /// Find digests whose title contains a query
    Search {
        /// Case-insensitive title fragment
        query: String,
    },

    /// Score generated digests against the reference corpora
    Evaluate {
        /// Folder of generated digests
        #[arg(long)]
        generated: Option<PathBuf>,

        /// Folder of generative-model reference digests
        #[arg(long)]
        llm_references: Option<PathBuf>,

        /// Folder of extractive reference digests
        #[arg(long)]
        extractive_references: Option<PathBuf>,

        /// Folder the report is written to
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Minimum filename similarity for a reference match
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Diagnose configuration and storage
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Init { force } => commands::init::run(config_path, force).await?,
        Commands::Run { text, file, title } => {
            commands::run::run(config_path, commands::run::Input::new(text, file, title)?).await?
        }
        Commands::Show { id } => commands::history::show(config_path, id).await?,
        Commands::Recent { limit } => commands::history::recent(config_path, limit).await?,
        Commands::Search { query } => commands::history::search(config_path, &query).await?,
        Commands::Evaluate {
            generated,
            llm_references,
            extractive_references,
            output,
            threshold,
        } => {
            let overrides = commands::evaluate::Overrides {
                generated,
                llm_references,
                extractive_references,
                output,
                threshold,
            };
            commands::evaluate::run(config_path, overrides).await?
        }
        Commands::Doctor => commands::doctor::run(config_path).await?,
    }

    Ok(())
}
