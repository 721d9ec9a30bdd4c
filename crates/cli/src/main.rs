//! Seoul Stash CLI - browse the catalog and manage the local cart and wishlist.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! stash catalog list k-beauty --facet brand=COSRX
//! stash catalog offers
//! stash catalog search pepero
//!
//! # Manage the cart
//! stash cart add kb1
//! stash cart set kb1 3
//! stash cart checkout --user alice
//!
//! # Manage the wishlist
//! stash wishlist add s3
//!
//! # Run database migrations (postgres storage backend)
//! stash migrate
//! ```
//!
//! # Commands
//!
//! - `catalog` - Catalog queries
//! - `cart` - Cart mutations and checkout
//! - `wishlist` - Wishlist mutations
//! - `migrate` - Run database migrations

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use seoul_stash_storefront::Storefront;
use seoul_stash_storefront::config::{LogFormat, StorefrontConfig};

mod commands;

const DEFAULT_LOG_FILTER: &str = "seoul_stash_storefront=info,seoul_stash_cli=info";

#[derive(Parser)]
#[command(name = "stash")]
#[command(author, version, about = "Seoul Stash storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query the product catalog
    Catalog {
        #[command(subcommand)]
        query: commands::catalog::CatalogCommand,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: commands::cart::CartCommand,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: commands::wishlist::WishlistCommand,
    },
    /// Run database migrations
    Migrate,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(LogFormat::default());
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    init_tracing(config.log_format);

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    if matches!(cli.command, Commands::Migrate) {
        commands::migrate::run(&config).await?;
        return Ok(());
    }

    let app = Storefront::open(config).await?;

    match cli.command {
        Commands::Catalog { query } => commands::catalog::run(&app, query).await?,
        Commands::Cart { action } => commands::cart::run(&app, action).await?,
        Commands::Wishlist { action } => commands::wishlist::run(&app, action).await?,
        Commands::Migrate => {}
    }
    Ok(())
}
