//! RocketShoes CLI - Inspect and edit the persisted cart.
//!
//! # Usage
//!
//! ```bash
//! # Print the cart as JSON
//! rs-cli cart show
//!
//! # Add one unit of product 3
//! rs-cli cart add 3
//!
//! # Set product 3 to quantity 2
//! rs-cli cart update 3 2
//!
//! # Remove product 3
//! rs-cli cart remove 3
//! ```
//!
//! # Commands
//!
//! - `cart` - Cart operations, backed by the same `CartStore` the server uses
//!
//! Reads `ROCKETSHOES_API_URL`, `ROCKETSHOES_STORAGE_DIR` and
//! `ROCKETSHOES_STORAGE_KEY` like the server does.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rocketshoes_core::ProductId;

mod commands;

#[derive(Parser)]
#[command(name = "rs-cli")]
#[command(author, version, about = "RocketShoes CLI tools")]
struct Cli {
    /// Override the cart storage directory
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart as JSON
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        product_id: ProductId,
    },
    /// Remove a product
    Remove {
        /// Product ID
        product_id: ProductId,
    },
    /// Set the quantity of a product already in the cart
    Update {
        /// Product ID
        product_id: ProductId,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

#[tokio::main]
async fn main() {
    // Logs and notifications go to stderr; stdout carries the cart JSON
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    match cli.command {
        Commands::Cart { action } => {
            let store = commands::cart::open_store(cli.storage_dir)?;
            let cart = match action {
                CartAction::Show => store.cart().await,
                CartAction::Add { product_id } => store.add_product(product_id).await?,
                CartAction::Remove { product_id } => store.remove_product(product_id).await?,
                CartAction::Update { product_id, amount } => {
                    store.update_product_amount(product_id, amount).await?
                }
            };
            commands::cart::print(&cart)?;
        }
    }
    Ok(())
}
