//! Goodstock-X CLI - catalog checks and shopper state maintenance.
//!
//! # Usage
//!
//! ```bash
//! # Show the catalog the storefront would serve
//! gs-cli catalog list
//!
//! # Validate a catalog file before deploying it
//! gs-cli catalog check catalog.json
//!
//! # Show one shopper's persisted cart and wishlist
//! gs-cli state inspect --shopper 3f6c...
//!
//! # Drop unreadable or outdated state blobs
//! gs-cli state repair
//!
//! # Check the product backend connection
//! gs-cli backend probe
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

/// Data directory used when `STOREFRONT_DATA_DIR` is not set.
const DEFAULT_DATA_DIR: &str = "data/state";

#[derive(Parser)]
#[command(name = "gs-cli")]
#[command(author, version, about = "Goodstock-X CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and validate the category catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Maintain persisted shopper state
    State {
        #[command(subcommand)]
        action: StateAction,
    },
    /// Check the product backend
    Backend {
        #[command(subcommand)]
        action: BackendAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List categories (built-in catalog unless a path is given)
    List {
        /// Catalog JSON file
        #[arg(short, long, env = "STOREFRONT_CATALOG_PATH")]
        path: Option<PathBuf>,
    },
    /// Validate a catalog JSON file
    Check {
        /// Catalog JSON file
        path: PathBuf,
    },
}

#[derive(Subcommand)]
enum StateAction {
    /// Show a shopper's cart and wishlist
    Inspect {
        /// Shopper id
        #[arg(short, long)]
        shopper: String,

        /// Directory holding persisted state
        #[arg(short, long, env = "STOREFRONT_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
        data_dir: PathBuf,
    },
    /// Remove a shopper's cart and wishlist
    Purge {
        /// Shopper id
        #[arg(short, long)]
        shopper: String,

        /// Directory holding persisted state
        #[arg(short, long, env = "STOREFRONT_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
        data_dir: PathBuf,
    },
    /// Remove corrupt or unknown-version state blobs
    Repair {
        /// Directory holding persisted state
        #[arg(short, long, env = "STOREFRONT_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
        data_dir: PathBuf,
    },
}

#[derive(Subcommand)]
enum BackendAction {
    /// Check connectivity to `BACKEND_URL`
    Probe,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load .env so clap's env fallbacks see it
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List { path } => commands::catalog::list(path.as_deref())?,
            CatalogAction::Check { path } => commands::catalog::check(&path)?,
        },
        Commands::State { action } => match action {
            StateAction::Inspect { shopper, data_dir } => {
                commands::state::inspect(&data_dir, &shopper).await?;
            }
            StateAction::Purge { shopper, data_dir } => {
                commands::state::purge(&data_dir, &shopper).await?;
            }
            StateAction::Repair { data_dir } => {
                commands::state::repair(&data_dir).await?;
            }
        },
        Commands::Backend { action } => match action {
            BackendAction::Probe => commands::backend::probe().await?,
        },
    }
    Ok(())
}
