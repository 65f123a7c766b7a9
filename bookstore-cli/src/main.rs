//! Bookstore CLI - browse the book catalog and manage liked books and the cart

mod commands;

use anyhow::{Context, Result};
use bookstore_core::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse and validate max results (1-40, the catalog's page limit)
fn parse_max_results(s: &str) -> Result<u32, String> {
    let n: u32 = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if (1..=40).contains(&n) {
        Ok(n)
    } else {
        Err("max results must be between 1 and 40".to_string())
    }
}

#[derive(Parser)]
#[command(name = "bookstore")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory for liked books and cart data [default: $BOOKSTORE_DATA_DIR or ./bookstore_data]
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Catalog API key [default: $GOOGLE_BOOKS_API_KEY]
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Catalog base URL [default: $BOOKSTORE_CATALOG_URL or the Google Books API]
    #[arg(long, global = true)]
    catalog_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the book catalog
    Search {
        /// Search terms (browses popular books when empty)
        query: Vec<String>,

        /// Number of results to show
        #[arg(short = 'n', long, default_value = "20", value_parser = parse_max_results)]
        max_results: u32,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show details for a single book
    Show {
        /// Catalog id of the book
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show featured books
    Featured {
        /// Catalog queries, one featured book each (defaults to the built-in shelf)
        queries: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage liked books
    Likes {
        #[command(subcommand)]
        action: CollectionAction,
    },

    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CollectionAction,
    },
}

#[derive(Subcommand)]
pub enum CollectionAction {
    /// Add a book if absent, remove it if present
    Toggle {
        /// Catalog id of the book
        id: String,
    },

    /// Remove a book
    Remove {
        /// Catalog id of the book
        id: String,
    },

    /// Remove every book
    Clear,

    /// Print stored ids without contacting the catalog
    Ids {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve and print every book
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "bookstore_cli=debug,bookstore_core=debug"
    } else {
        "bookstore_cli=info,bookstore_core=warn"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::from_env().context("Invalid environment configuration")?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(api_key) = cli.api_key {
        config.api_key = Some(api_key);
    }
    if let Some(catalog_url) = cli.catalog_url {
        config.catalog_url = catalog_url;
    }

    let ctx = commands::Context::new(config);

    match cli.command {
        Commands::Search {
            query,
            max_results,
            json,
        } => commands::search(&ctx, &query.join(" "), max_results, json).await,

        Commands::Show { id, json } => commands::show(&ctx, &id, json).await,

        Commands::Featured { queries, json } => commands::featured(&ctx, &queries, json).await,

        Commands::Likes { action } => commands::likes(&ctx, action).await,

        Commands::Cart { action } => commands::cart(&ctx, action).await,
    }
}
