#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the catalog import tool.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use storefront_catalog_models::CatalogQuery;
use storefront_database::{DuckDbCatalogStore, catalog_db};
use storefront_ingest::config::IngestConfig;
use storefront_ingest::{ImportError, all_sources, importer_for, run_import};
use storefront_ingest_models::ImportOutcome;
use storefront_source::registry::DEFAULT_SOURCE;

#[derive(Parser)]
#[command(name = "storefront_ingest", about = "Product catalog import tool")]
struct Cli {
    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Catalog `DuckDB` file (overrides config and `STOREFRONT_DATABASE_PATH`)
    #[arg(long, global = true)]
    database: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import the catalog of one provider
    Import {
        /// Provider identifier (e.g., "fakestore")
        #[arg(long, default_value = DEFAULT_SOURCE)]
        source: String,
    },
    /// List all registered providers
    Sources,
    /// Query the imported catalog
    Products {
        /// Case-insensitive title substring
        #[arg(long)]
        search: Option<String>,
        /// Exact category
        #[arg(long)]
        category: Option<String>,
        /// Inclusive lower price bound
        #[arg(long)]
        min_price: Option<Decimal>,
        /// Inclusive upper price bound
        #[arg(long)]
        max_price: Option<Decimal>,
        /// 1-based page number
        #[arg(long)]
        page: Option<u32>,
        /// Records per page (1-100, default 15)
        #[arg(long)]
        per_page: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let mut config = IngestConfig::load(cli.config.as_deref())?;
    if let Some(database) = cli.database {
        config.database_path = database;
    }

    match cli.command {
        Commands::Import { source } => match import(&source, &config).await {
            Ok(outcome) => {
                println!("{}", outcome.message);
                Ok(if outcome.success {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::FAILURE
                })
            }
            Err(e) => {
                eprintln!("Error during import: {e}");
                Ok(ExitCode::FAILURE)
            }
        },
        Commands::Sources => {
            println!("{:<12} {:<12} NAME", "ID", "KIND");
            println!("{}", "-".repeat(50));
            for source in &all_sources() {
                println!("{:<12} {:<12} {}", source.id(), source.kind, source.name());
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Products {
            search,
            category,
            min_price,
            max_price,
            page,
            per_page,
        } => {
            let query = CatalogQuery {
                search,
                category,
                min_price,
                max_price,
                page,
                per_page,
            };
            let store = DuckDbCatalogStore::open(&config.database_path)?;
            let page = catalog_db::query_records(store.connection(), &query)?;

            println!("{:<12} {:<8} {:>10}  {:<20} TITLE", "SOURCE", "ID", "PRICE", "CATEGORY");
            println!("{}", "-".repeat(80));
            for record in &page.records {
                println!(
                    "{:<12} {:<8} {:>10}  {:<20} {}",
                    record.external_source,
                    record.external_id,
                    record.price,
                    record.category,
                    record.title
                );
            }
            println!(
                "Page {} of {} ({} products)",
                page.page, page.last_page, page.total
            );
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Resolves the provider first so an unknown name fails before the catalog
/// is opened.
async fn import(source: &str, config: &IngestConfig) -> Result<ImportOutcome, ImportError> {
    let importer = importer_for(source, config)?;

    log::info!("Opening catalog at {}", config.database_path.display());
    let store = DuckDbCatalogStore::open(&config.database_path)?;

    run_import(importer.as_ref(), &store).await
}
