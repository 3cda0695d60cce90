//! tinycart CLI - catalog browsing and a local shopping session.
//!
//! # Usage
//!
//! ```bash
//! # Print the category list as JSON
//! tinycart categories
//!
//! # Browse the catalog
//! tinycart products --limit 10 --skip 20
//! tinycart product 1
//! tinycart search phone
//! tinycart category smartphones
//!
//! # Work with the cart stored under $TINYCART_STORAGE_DIR
//! tinycart cart add 1
//! tinycart cart update 1 3
//! tinycart cart show
//!
//! # Log in with a saved auth response, then log out
//! tinycart login user.json
//! tinycart logout
//! ```
//!
//! # Commands
//!
//! - `categories` - Print category identifiers (always exits 0)
//! - `products`, `product`, `search`, `category` - Print product JSON
//! - `cart` - Show or change the local cart
//! - `login`, `logout`, `whoami` - Manage the local login state

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tinycart_core::ProductId;
use tinycart_storefront::StorefrontConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "tinycart")]
#[command(author, version, about = "tinycart shop CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the catalog's category list as JSON
    Categories,
    /// List a page of products
    Products {
        /// Page size
        #[arg(short, long, default_value_t = 20)]
        limit: u32,

        /// Number of products to skip
        #[arg(short, long, default_value_t = 0)]
        skip: u32,
    },
    /// Show a single product
    Product {
        /// Product ID
        id: ProductId,
    },
    /// Search products by free text
    Search {
        /// Search terms
        query: String,
    },
    /// List the products in a category
    Category {
        /// Category slug (see `tinycart categories`)
        slug: String,
    },
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Log in using a saved auth response (JSON file)
    Login {
        /// Path to the user JSON
        user_file: PathBuf,
    },
    /// Log out
    Logout,
    /// Show the logged-in user
    Whoami,
}

#[derive(Subcommand)]
enum CartAction {
    /// Print cart lines and totals
    Show,
    /// Fetch a product and add one unit of it
    Add {
        /// Product ID
        id: ProductId,
    },
    /// Remove a product's line
    Remove {
        /// Product ID
        id: ProductId,
    },
    /// Set a line's quantity (0 or less removes it)
    Update {
        /// Product ID
        id: ProductId,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove every line
    Clear,
}

/// Initialize tracing on stderr so stdout carries only command output.
fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tinycart=info,tinycart_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;

    match cli.command {
        Commands::Categories => commands::catalog::categories(&config).await?,
        Commands::Products { limit, skip } => {
            commands::catalog::products(&config, limit, skip).await?;
        }
        Commands::Product { id } => commands::catalog::product(&config, id).await?,
        Commands::Search { query } => commands::catalog::search(&config, &query).await?,
        Commands::Category { slug } => commands::catalog::category(&config, &slug).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&config)?,
            CartAction::Add { id } => commands::cart::add(&config, id).await?,
            CartAction::Remove { id } => commands::cart::remove(&config, id)?,
            CartAction::Update { id, quantity } => commands::cart::update(&config, id, quantity)?,
            CartAction::Clear => commands::cart::clear(&config)?,
        },
        Commands::Login { user_file } => commands::session::login(&config, &user_file)?,
        Commands::Logout => commands::session::logout(&config)?,
        Commands::Whoami => commands::session::whoami(&config)?,
    }
    Ok(())
}
