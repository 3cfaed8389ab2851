use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{ListingSource, VehicleRepository};
use crate::domain::types::Vehicle;
use crate::error::ApiError;

pub const DEFAULT_MAKES: &[&str] = &[
    "BMW",
    "Mercedes-Benz",
    "Toyota",
    "Honda",
    "Ford",
    "Chevrolet",
    "Audi",
    "Lexus",
];

pub struct ImportOptions {
    pub makes: Vec<String>,
    pub per_make: u32,
    /// Import even when the collection already has listings.
    pub force: bool,
    /// Fetch and map only; nothing is written.
    pub dry_run: bool,
    /// Pause between makes to respect the feed's rate limit.
    pub delay: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Collection was not empty and `force` was not set.
    Skipped { existing: u64 },
    Imported {
        inserted: usize,
        failed_makes: Vec<String>,
        total: u64,
    },
    DryRun { fetched: usize, failed_makes: Vec<String> },
}

// ── ImportInventory ──────────────────────────────────────────────────────────

pub struct ImportInventoryUseCase<V: VehicleRepository, L: ListingSource> {
    pub vehicles: V,
    pub listings: L,
}

impl<V: VehicleRepository, L: ListingSource> ImportInventoryUseCase<V, L> {
    pub async fn execute(&self, options: ImportOptions) -> Result<ImportOutcome, ApiError> {
        let existing = self.vehicles.count().await?;
        if existing > 0 && !options.force {
            tracing::info!(existing, "inventory already populated, skipping import");
            return Ok(ImportOutcome::Skipped { existing });
        }

        let mut fetched = Vec::new();
        let mut failed_makes = Vec::new();
        for (i, make) in options.makes.iter().enumerate() {
            if i > 0 && !options.delay.is_zero() {
                tokio::time::sleep(options.delay).await;
            }
            match self.listings.search(make, options.per_make).await {
                Ok(drafts) => {
                    let now = Utc::now();
                    let before = fetched.len();
                    fetched.extend(
                        drafts
                            .into_iter()
                            .take(options.per_make as usize)
                            .filter_map(|mut draft| {
                                let vin = draft.vin.take().filter(|v| !v.trim().is_empty())?;
                                Some(Vehicle::from_draft(Uuid::now_v7(), vin, draft, now))
                            }),
                    );
                    tracing::info!(make = %make, count = fetched.len() - before, "fetched listings");
                }
                Err(e) => {
                    tracing::warn!(make = %make, error = %format!("{e:#}"), "listing fetch failed, skipping make");
                    failed_makes.push(make.clone());
                }
            }
        }

        if options.dry_run {
            return Ok(ImportOutcome::DryRun {
                fetched: fetched.len(),
                failed_makes,
            });
        }

        self.vehicles.insert_many(&fetched).await?;
        let total = self.vehicles.count().await?;
        tracing::info!(inserted = fetched.len(), total, "inventory import complete");
        Ok(ImportOutcome::Imported {
            inserted: fetched.len(),
            failed_makes,
            total,
        })
    }
}
