//! Mercadito CLI - Browse the catalog and manage the cart from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # List every product, or filter by name or category
//! mercadito products
//! mercadito products --search mouse
//! mercadito products --category Tech
//!
//! # Manage the cart
//! mercadito cart add 3
//! mercadito cart remove 3
//! mercadito cart show
//! mercadito cart checkout
//! ```
//!
//! The cart is shared with the storefront when both point at the same data
//! directory (`STOREFRONT_DATA_DIR`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use mercadito_core::ProductId;
use mercadito_storefront::catalog::{AnySource, RetryPolicy};
use mercadito_storefront::config::{DEFAULT_CATALOG_SOURCE, DEFAULT_DATA_DIR};

mod commands;

use commands::Context;

#[derive(Parser)]
#[command(name = "mercadito")]
#[command(author, version, about = "Mercadito command-line shop")]
struct Cli {
    /// Catalog location (URL or JSON file)
    #[arg(long, env = "CATALOG_SOURCE", default_value = DEFAULT_CATALOG_SOURCE, global = true)]
    catalog: String,

    /// Directory holding the persisted cart
    #[arg(long, env = "STOREFRONT_DATA_DIR", default_value = DEFAULT_DATA_DIR, global = true)]
    data_dir: PathBuf,

    /// Catalog fetch attempts before giving up
    #[arg(long, env = "CATALOG_FETCH_ATTEMPTS", default_value_t = 3, global = true)]
    attempts: u32,

    /// Pause between catalog fetch attempts, in milliseconds
    #[arg(long, env = "CATALOG_FETCH_RETRY_MS", default_value_t = 500, global = true)]
    retry_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products {
        /// Only products whose name contains this text (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,

        /// Only products in this category (exact match)
        #[arg(short, long, conflicts_with = "search")]
        category: Option<String>,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and totals
    Show,
    /// Add one unit of a product
    Add {
        /// Product id
        id: ProductId,
    },
    /// Remove one unit of a product
    Remove {
        /// Product id
        id: ProductId,
    },
    /// Place the order and empty the cart
    Checkout,
    /// Empty the cart without ordering
    Clear,
}

#[tokio::main]
async fn main() {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn retry_policy(cli: &Cli) -> RetryPolicy {
    RetryPolicy::new(cli.attempts, Duration::from_millis(cli.retry_ms))
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context {
        source: AnySource::parse(&cli.catalog)?,
        retry: retry_policy(&cli),
        data_dir: cli.data_dir,
    };

    match cli.command {
        Commands::Products { search, category } => {
            commands::products::list(&ctx, search.as_deref(), category.as_deref()).await?;
        }
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&ctx),
            CartAction::Add { id } => commands::cart::add(&ctx, id).await?,
            CartAction::Remove { id } => commands::cart::remove(&ctx, id)?,
            CartAction::Checkout => commands::cart::checkout(&ctx)?,
            CartAction::Clear => commands::cart::clear(&ctx)?,
        },
    }
    Ok(())
}
