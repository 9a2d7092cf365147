mod catalog;
mod filters;

use clap::{Parser, Subcommand};
use storefront_shopify::StorefrontClient;

#[derive(Debug, Parser)]
#[command(name = "storefront-cli")]
#[command(about = "Inspect storefront filters and catalog pages")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show a collection's facets and the API filters a query string selects
    Filters {
        /// Collection whose facets are used
        #[arg(long, default_value = "all-products")]
        collection: String,
        /// Listing query string, e.g. "Brand=Nike&price=10,50"
        #[arg(long, default_value = "")]
        query: String,
    },
    /// Toggle one filter value in a query string and print the new URL
    Toggle {
        /// Current query string
        #[arg(long, default_value = "")]
        query: String,
        /// Facet label, e.g. "Brand"
        #[arg(long)]
        key: String,
        /// Value label, e.g. "Nike"
        #[arg(long)]
        value: String,
        /// Path the URL is built on
        #[arg(long, default_value = "/products")]
        path: String,
    },
    /// List one page of products, filtered by the query string
    Products {
        /// Collection to list; the whole catalog when omitted
        #[arg(long)]
        collection: Option<String>,
        #[arg(long, default_value = "")]
        query: String,
    },
    /// Search products
    Search {
        term: String,
        #[arg(long, default_value = "")]
        query: String,
    },
    /// List collections
    Collections,
    /// Print brands, types and option values across the catalog
    Meta,
    /// Print shop name and branding
    Shop,
    /// Print a navigation menu as an indented tree
    Menu {
        #[arg(default_value = "main-menu")]
        handle: String,
    },
    /// List online-store pages, or print one by handle
    Pages { handle: Option<String> },
}

fn build_client() -> anyhow::Result<StorefrontClient> {
    let config = storefront_core::load_app_config()?;
    StorefrontClient::from_config(&config)
        .map_err(|e| anyhow::anyhow!("failed to build storefront client: {e}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Filters { collection, query }) => {
            filters::run_filters(&build_client()?, &collection, &query).await?;
        }
        Some(Commands::Toggle {
            query,
            key,
            value,
            path,
        }) => filters::run_toggle(&path, &query, &key, &value),
        Some(Commands::Products { collection, query }) => {
            catalog::run_products(&build_client()?, collection.as_deref(), &query).await?;
        }
        Some(Commands::Search { term, query }) => {
            catalog::run_search(&build_client()?, &term, &query).await?;
        }
        Some(Commands::Collections) => catalog::run_collections(&build_client()?).await?,
        Some(Commands::Meta) => catalog::run_meta(&build_client()?).await?,
        Some(Commands::Shop) => catalog::run_shop(&build_client()?).await?,
        Some(Commands::Menu { handle }) => catalog::run_menu(&build_client()?, &handle).await?,
        Some(Commands::Pages { handle }) => {
            catalog::run_pages(&build_client()?, handle.as_deref()).await?;
        }
        None => println!("storefront-cli: pass --help for commands"),
    }

    Ok(())
}
