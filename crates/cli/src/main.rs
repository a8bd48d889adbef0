//! Catalog CLI - Inspect and maintain catalog cache snapshots.
//!
//! # Usage
//!
//! ```bash
//! # Show record and handle counts for a snapshot
//! catalog-cli inspect cache.json
//!
//! # Print a cached product as JSON
//! catalog-cli get cache.json --type product --handle my-product
//!
//! # Drop expired records and compact the snapshot in place
//! catalog-cli prune cache.json
//! ```
//!
//! # Commands
//!
//! - `inspect` - Print snapshot statistics
//! - `get` - Look up a record by type and handle
//! - `prune` - Evict expired records and rewrite the snapshot
//!
//! # Environment Variables
//!
//! - `CATALOG_CACHE_TIMEOUT` - Freshness window in seconds (default: 300)
//! - `RUST_LOG` - Log filter (default: `catalog_cli=info,catalog_cache=info`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::HandleType;

#[derive(Parser)]
#[command(name = "catalog-cli")]
#[command(author, version, about = "Catalog cache snapshot tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print statistics for a snapshot
    Inspect {
        /// Snapshot file
        file: PathBuf,
    },
    /// Look up a record by handle
    Get {
        /// Snapshot file
        file: PathBuf,

        /// Entity type to look up
        #[arg(short = 't', long = "type", value_enum)]
        entity_type: HandleType,

        /// Record handle
        #[arg(short = 'H', long)]
        handle: String,
    },
    /// Evict expired records and write a compacted snapshot
    Prune {
        /// Snapshot file
        file: PathBuf,

        /// Write here instead of overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "catalog_cli=info,catalog_cache=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Inspect { file } => commands::inspect::run(&file).await?,
        Commands::Get {
            file,
            entity_type,
            handle,
        } => commands::get::run(&file, entity_type.into(), &handle).await?,
        Commands::Prune { file, output } => {
            let output = output.unwrap_or_else(|| file.clone());
            commands::prune::run(&file, &output).await?;
        }
    }
    Ok(())
}
