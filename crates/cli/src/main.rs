//! Driftwood CLI - Browse the catalog and manage a cart from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # List products, optionally filtered and sorted
//! dw-cli products --category Home --sort price-asc
//!
//! # Search the catalog
//! dw-cli search lamp
//!
//! # Work with the local cart
//! dw-cli cart add desk-lamp --quantity 2
//! dw-cli cart set desk-lamp 1
//! dw-cli cart remove desk-lamp
//! dw-cli cart show
//! dw-cli cart clear
//! ```
//!
//! The cart lives in a single file (`DW_CART_FILE`, default
//! `.driftwood/cart.json`) in the same format the storefront writes, so a
//! storefront cart slot can be inspected or edited with `--cart-file`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use driftwood_storefront::catalog::Catalog;

mod commands;

#[derive(Parser)]
#[command(name = "dw-cli")]
#[command(author, version, about = "Driftwood CLI tools")]
struct Cli {
    /// Catalog JSON file (defaults to the bundled catalog)
    #[arg(long, env = "STOREFRONT_CATALOG_PATH", global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog products
    Products {
        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,

        /// Sort order (`featured`, `price-asc`, `price-desc`, `newest`)
        #[arg(short, long, default_value = "featured")]
        sort: String,
    },
    /// Search products by name, description or category
    Search {
        /// Search text (at least two characters)
        query: String,
    },
    /// Manage the local cart
    Cart {
        /// Cart file
        #[arg(long, env = "DW_CART_FILE", default_value = ".driftwood/cart.json")]
        cart_file: PathBuf,

        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart contents and totals
    Show,
    /// Add a product (repeated adds of one unit each)
    Add {
        /// Product id
        id: String,

        /// Number of units to add
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=99))]
        quantity: u32,
    },
    /// Set a line item's quantity; 0 or less removes it, above 999 caps it
    Set {
        /// Product id
        id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line item
    Remove {
        /// Product id
        id: String,
    },
    /// Remove every line item
    Clear,
}

fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Cart notifications are logged under the `driftwood::toast` target
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn,driftwood::toast=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = match &cli.catalog {
        Some(path) => Catalog::load(path)?,
        None => Catalog::embedded()?,
    };

    match cli.command {
        Commands::Products { category, sort } => {
            commands::catalog::products(&catalog, category.as_deref(), &sort);
        }
        Commands::Search { query } => commands::catalog::search(&catalog, &query),
        Commands::Cart { cart_file, action } => {
            let mut store = commands::cart::open(&cart_file);
            match action {
                CartAction::Show => {}
                CartAction::Add { id, quantity } => {
                    commands::cart::add(&mut store, &catalog, &id, quantity)?;
                }
                CartAction::Set { id, quantity } => {
                    commands::cart::set(&mut store, &id, quantity);
                }
                CartAction::Remove { id } => commands::cart::remove(&mut store, &id),
                CartAction::Clear => {
                    store.clear_cart();
                }
            }
            commands::cart::show(&store);
        }
    }
    Ok(())
}
