//! Ports implemented by `infra` and by the test doubles.
//!
//! Methods are declared as `impl Future + Send` so the generic axum handlers
//! stay `Send`; implementors write plain `async fn`.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use autovault_domain::pagination::PageRequest;

use crate::domain::types::{
    Alert, NearbyDealership, NotifyError, SmsError, SmsReceipt, User, Vehicle, VehicleDraft,
};
use crate::error::ApiError;

/// Repository for account records.
pub trait UserRepository: Send + Sync {
    fn find_by_id(&self, id: &str) -> impl Future<Output = Result<Option<User>, ApiError>> + Send;

    /// Insert or overwrite by id. `created_at` of an existing row is kept.
    fn upsert(&self, user: &User) -> impl Future<Output = Result<User, ApiError>> + Send;

    fn list_all(&self) -> impl Future<Output = Result<Vec<User>, ApiError>> + Send;

    fn find_by_ids(
        &self,
        ids: &[String],
    ) -> impl Future<Output = Result<Vec<User>, ApiError>> + Send;
}

/// Repository for alerts.
pub trait AlertRepository: Send + Sync {
    fn create(&self, alert: &Alert) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Single write of the SMS outcome after the send attempt.
    fn record_sms_outcome(
        &self,
        id: Uuid,
        sms_sent: bool,
        sms_error: Option<&str>,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn find_by_id(&self, id: Uuid) -> impl Future<Output = Result<Option<Alert>, ApiError>> + Send;

    /// Flip `read` to true. A row that is already read is left untouched.
    fn mark_read(
        &self,
        id: Uuid,
        read_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Newest first.
    fn list_for_user(
        &self,
        user_id: &str,
        limit: u64,
    ) -> impl Future<Output = Result<Vec<Alert>, ApiError>> + Send;

    /// Newest first.
    fn list_page(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = Result<Vec<Alert>, ApiError>> + Send;

    fn count(&self) -> impl Future<Output = Result<u64, ApiError>> + Send;
}

/// Repository for inventory listings.
pub trait VehicleRepository: Send + Sync {
    /// Up to `count` listings in random order.
    fn sample_random(
        &self,
        count: u64,
    ) -> impl Future<Output = Result<Vec<Vehicle>, ApiError>> + Send;

    fn count(&self) -> impl Future<Output = Result<u64, ApiError>> + Send;

    /// Newest first.
    fn list_page(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = Result<Vec<Vehicle>, ApiError>> + Send;

    /// First match by insertion order when a VIN is duplicated.
    fn find_by_vin(&self, vin: &str)
    -> impl Future<Output = Result<Option<Vehicle>, ApiError>> + Send;

    fn find_by_id(&self, id: Uuid) -> impl Future<Output = Result<Option<Vehicle>, ApiError>> + Send;

    fn list_by_make(&self, make: &str)
    -> impl Future<Output = Result<Vec<Vehicle>, ApiError>> + Send;

    fn create(&self, vehicle: &Vehicle) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn update(&self, vehicle: &Vehicle) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Returns `true` if a row was deleted.
    fn delete(&self, id: Uuid) -> impl Future<Output = Result<bool, ApiError>> + Send;

    fn insert_many(&self, vehicles: &[Vehicle])
    -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// Outbound SMS delivery.
pub trait SmsGateway: Send + Sync {
    fn send(&self, to: &str, body: &str)
    -> impl Future<Output = Result<SmsReceipt, SmsError>> + Send;
}

/// Places lookup for car dealers near a coordinate.
pub trait PlacesSearch: Send + Sync {
    /// `radius_m` is in metres.
    fn nearby_dealerships(
        &self,
        lat: f64,
        lng: f64,
        radius_m: u32,
    ) -> impl Future<Output = Result<Vec<NearbyDealership>, anyhow::Error>> + Send;
}

/// Fan-out to connected realtime listeners.
pub trait RealtimeNotifier: Send + Sync {
    /// Returns the number of listeners that received the event.
    fn broadcast(&self, event: &str, payload: serde_json::Value) -> Result<usize, NotifyError>;
}

/// Third-party listing feed used to seed inventory.
pub trait ListingSource: Send + Sync {
    fn search(
        &self,
        make: &str,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<VehicleDraft>, anyhow::Error>> + Send;
}
