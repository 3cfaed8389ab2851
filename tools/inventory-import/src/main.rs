//! Seeds the vehicle inventory from the Marketcheck listing search.
//!
//! # Usage
//!
//! ```bash
//! # Import the default makes into an empty inventory
//! cargo run -p inventory-import
//!
//! # Re-import two makes into a populated inventory
//! cargo run -p inventory-import -- --makes Toyota,Honda --force
//! ```
//!
//! Reads `DATABASE_URL`, `MARKETCHECK_API_KEY` and optionally
//! `MARKETCHECK_URL` from the environment (or `.env`).

use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::Parser;
use sea_orm::Database;

use autovault_api::infra::db::DbVehicleRepository;
use autovault_api::infra::marketcheck::MarketcheckClient;
use autovault_api::usecase::import::{
    DEFAULT_MAKES, ImportInventoryUseCase, ImportOptions, ImportOutcome,
};
use autovault_core::tracing::init_tracing;

#[derive(Parser)]
#[command(about = "Seed the vehicle inventory from the listing API")]
struct Args {
    /// Makes to fetch, comma separated. Defaults to a mixed set of eight.
    #[arg(long, value_delimiter = ',')]
    makes: Vec<String>,

    /// Listings to keep per make
    #[arg(long, default_value_t = 25)]
    per_make: u32,

    /// Import even if the inventory already has listings
    #[arg(long)]
    force: bool,

    /// Fetch and count only; write nothing
    #[arg(long)]
    dry_run: bool,

    /// Pause between makes, in milliseconds
    #[arg(long, default_value_t = 1000)]
    delay_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();
    let args = Args::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL")?;
    let api_key = std::env::var("MARKETCHECK_API_KEY").context("MARKETCHECK_API_KEY")?;
    let search_url = std::env::var("MARKETCHECK_URL").ok();

    let db = Database::connect(&database_url)
        .await
        .context("failed to connect to database")?;

    let makes = if args.makes.is_empty() {
        DEFAULT_MAKES.iter().map(|m| (*m).to_owned()).collect()
    } else {
        args.makes
    };

    let usecase = ImportInventoryUseCase {
        vehicles: DbVehicleRepository { db },
        listings: MarketcheckClient::new(reqwest::Client::new(), api_key, search_url),
    };
    let outcome = usecase
        .execute(ImportOptions {
            makes,
            per_make: args.per_make,
            force: args.force,
            dry_run: args.dry_run,
            delay: Duration::from_millis(args.delay_ms),
        })
        .await
        .context("import failed")?;

    match outcome {
        ImportOutcome::Skipped { existing } => {
            println!("Found {existing} existing vehicles. Skipping import (use --force to override).");
        }
        ImportOutcome::Imported {
            inserted,
            failed_makes,
            total,
        } => {
            println!("Imported {inserted} vehicles. Inventory now holds {total}.");
            if !failed_makes.is_empty() {
                println!("Skipped makes: {}", failed_makes.join(", "));
            }
        }
        ImportOutcome::DryRun {
            fetched,
            failed_makes,
        } => {
            println!("Dry run: fetched {fetched} vehicles, nothing written.");
            if !failed_makes.is_empty() {
                println!("Skipped makes: {}", failed_makes.join(", "));
            }
        }
    }
    Ok(())
}
