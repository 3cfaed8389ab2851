use chrono::Utc;
use uuid::Uuid;

use autovault_domain::pagination::{PageRequest, Pagination};

use crate::domain::dealership::distinct_dealerships;
use crate::domain::repository::{PlacesSearch, VehicleRepository};
use crate::domain::types::{Dealership, NearbyDealership, Vehicle, VehicleDraft};
use crate::error::ApiError;

pub const DEFAULT_RANDOM_COUNT: u64 = 3;
pub const DEFAULT_SEARCH_RADIUS_M: u32 = 10_000;

/// Postgres binds LIMIT as a signed 64-bit integer.
const MAX_SAMPLE_SIZE: u64 = i64::MAX as u64;

/// `0` means the default; anything past the binder's range is capped.
fn sample_size(count: u64) -> u64 {
    match count {
        0 => DEFAULT_RANDOM_COUNT,
        n => n.min(MAX_SAMPLE_SIZE),
    }
}

// ── GetRandomVehicles ────────────────────────────────────────────────────────

pub struct GetRandomVehiclesUseCase<V: VehicleRepository> {
    pub vehicles: V,
}

impl<V: VehicleRepository> GetRandomVehiclesUseCase<V> {
    /// Up to `count` distinct listings in random order. Asking for more than
    /// exist returns every listing once.
    pub async fn execute(&self, count: u64) -> Result<Vec<Vehicle>, ApiError> {
        let sample = self.vehicles.sample_random(sample_size(count)).await?;
        if sample.is_empty() {
            return Err(ApiError::NoVehicles);
        }
        Ok(sample)
    }
}

// ── ListVehicles ─────────────────────────────────────────────────────────────

pub struct VehiclePage {
    pub cars: Vec<Vehicle>,
    pub pagination: Pagination,
}

pub struct ListVehiclesUseCase<V: VehicleRepository> {
    pub vehicles: V,
}

impl<V: VehicleRepository> ListVehiclesUseCase<V> {
    pub async fn execute(&self, page: PageRequest) -> Result<VehiclePage, ApiError> {
        let page = page.clamped();
        let cars = self.vehicles.list_page(page).await?;
        let total = self.vehicles.count().await?;
        Ok(VehiclePage {
            cars,
            pagination: Pagination::new(page, total),
        })
    }
}

// ── GetVehicleByVin ──────────────────────────────────────────────────────────

pub struct GetVehicleByVinUseCase<V: VehicleRepository> {
    pub vehicles: V,
}

impl<V: VehicleRepository> GetVehicleByVinUseCase<V> {
    pub async fn execute(&self, vin: &str) -> Result<Vehicle, ApiError> {
        self.vehicles
            .find_by_vin(vin)
            .await?
            .ok_or(ApiError::VehicleNotFound)
    }
}

// ── AddVehicle ───────────────────────────────────────────────────────────────

pub struct AddVehicleUseCase<V: VehicleRepository> {
    pub vehicles: V,
}

impl<V: VehicleRepository> AddVehicleUseCase<V> {
    pub async fn execute(&self, mut draft: VehicleDraft) -> Result<Vehicle, ApiError> {
        let vin = draft
            .vin
            .take()
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::invalid("vin is required"))?;
        let vehicle = Vehicle::from_draft(Uuid::now_v7(), vin, draft, Utc::now());
        self.vehicles.create(&vehicle).await?;
        tracing::info!(vehicle_id = %vehicle.id, vin = %vehicle.vin, "vehicle added");
        Ok(vehicle)
    }
}

// ── UpdateVehicle ────────────────────────────────────────────────────────────

pub struct UpdateVehicleUseCase<V: VehicleRepository> {
    pub vehicles: V,
}

impl<V: VehicleRepository> UpdateVehicleUseCase<V> {
    /// Last write wins; there is no version check.
    pub async fn execute(&self, id: Uuid, mut draft: VehicleDraft) -> Result<Vehicle, ApiError> {
        if let Some(vin) = draft.vin.as_mut() {
            *vin = vin.trim().to_owned();
            if vin.is_empty() {
                return Err(ApiError::invalid("vin must not be empty"));
            }
        }
        let mut vehicle = self
            .vehicles
            .find_by_id(id)
            .await?
            .ok_or(ApiError::VehicleNotFound)?;
        vehicle.apply(draft, Utc::now());
        self.vehicles.update(&vehicle).await?;
        Ok(vehicle)
    }
}

// ── DeleteVehicle ────────────────────────────────────────────────────────────

pub struct DeleteVehicleUseCase<V: VehicleRepository> {
    pub vehicles: V,
}

impl<V: VehicleRepository> DeleteVehicleUseCase<V> {
    pub async fn execute(&self, id: Uuid) -> Result<(), ApiError> {
        if !self.vehicles.delete(id).await? {
            return Err(ApiError::VehicleNotFound);
        }
        tracing::info!(vehicle_id = %id, "vehicle deleted");
        Ok(())
    }
}

// ── GetDealerships ───────────────────────────────────────────────────────────

/// Dealerships selling the same make as the listing with `vin`, derived from
/// inventory rows only.
pub struct GetDealershipsUseCase<V: VehicleRepository> {
    pub vehicles: V,
}

impl<V: VehicleRepository> GetDealershipsUseCase<V> {
    pub async fn execute(&self, vin: &str) -> Result<Vec<Dealership>, ApiError> {
        let target = self
            .vehicles
            .find_by_vin(vin)
            .await?
            .ok_or(ApiError::VehicleNotFound)?;
        if target.dealer.is_none() {
            return Err(ApiError::MissingDealer);
        }
        let candidates = match target.make.as_deref().filter(|m| !m.is_empty()) {
            Some(make) => self.vehicles.list_by_make(make).await?,
            None => Vec::new(),
        };
        // The target row is always a candidate, even when its make is blank.
        let mut rows = Vec::with_capacity(candidates.len() + 1);
        rows.push(target);
        rows.extend(candidates);
        Ok(distinct_dealerships(vin, &rows))
    }
}

// ── GetNearbyDealerships ─────────────────────────────────────────────────────

pub struct GetNearbyDealershipsUseCase<V: VehicleRepository, P: PlacesSearch> {
    pub vehicles: V,
    pub places: P,
}

impl<V: VehicleRepository, P: PlacesSearch> GetNearbyDealershipsUseCase<V, P> {
    /// Car dealers within `radius_m` of the listing's dealer location.
    pub async fn execute(
        &self,
        vin: &str,
        radius_m: u32,
    ) -> Result<Vec<NearbyDealership>, ApiError> {
        let target = self
            .vehicles
            .find_by_vin(vin)
            .await?
            .ok_or(ApiError::VehicleNotFound)?;
        let (lat, lng) = target
            .dealer
            .as_ref()
            .and_then(|d| location(d.lat, d.lng))
            .ok_or(ApiError::LocationUnavailable)?;
        Ok(self.places.nearby_dealerships(lat, lng, radius_m).await?)
    }
}

/// A zero coordinate is treated as unknown.
fn location(lat: Option<f64>, lng: Option<f64>) -> Option<(f64, f64)> {
    match (lat?, lng?) {
        (lat, lng) if lat != 0.0 && lng != 0.0 => Some((lat, lng)),
        _ => None,
    }
}
