use std::sync::{Arc, Mutex};

use axum_test::TestServer;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use uuid::Uuid;

use autovault_api::domain::repository::{
    AlertRepository, ListingSource, PlacesSearch, RealtimeNotifier, SmsGateway, UserRepository,
    VehicleRepository,
};
use autovault_api::domain::types::{
    Alert, Dealer, NearbyDealership, NotifyError, SmsError, SmsReceipt, User, Vehicle,
    VehicleDraft,
};
use autovault_api::error::ApiError;
use autovault_api::infra::realtime::BroadcastHub;
use autovault_api::router::build_router;
use autovault_api::state::{AppState, Backend};
use autovault_auth_types::token::CredentialVerifier;
use autovault_domain::pagination::PageRequest;
use autovault_domain::role::Role;
use autovault_testing::auth::{TEST_SECRET, TestCredentials};

// ── MockUserRepo ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
    pub fail: bool,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn check(&self) -> Result<(), ApiError> {
        if self.fail {
            return Err(anyhow::anyhow!("user store unavailable").into());
        }
        Ok(())
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, ApiError> {
        self.check()?;
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn upsert(&self, user: &User) -> Result<User, ApiError> {
        self.check()?;
        let mut users = self.users.lock().unwrap();
        let mut saved = user.clone();
        if let Some(existing) = users.iter_mut().find(|u| u.id == user.id) {
            saved.created_at = existing.created_at;
            *existing = saved.clone();
        } else {
            users.push(saved.clone());
        }
        Ok(saved)
    }

    async fn list_all(&self) -> Result<Vec<User>, ApiError> {
        self.check()?;
        Ok(self.users.lock().unwrap().clone())
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<User>, ApiError> {
        self.check()?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }
}

// ── MockAlertRepo ────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockAlertRepo {
    pub alerts: Arc<Mutex<Vec<Alert>>>,
    pub fail_create: bool,
    pub fail_outcome: bool,
    /// Number of `mark_read` writes that actually changed a row.
    pub read_writes: Arc<Mutex<u32>>,
}

impl MockAlertRepo {
    pub fn new(alerts: Vec<Alert>) -> Self {
        Self {
            alerts: Arc::new(Mutex::new(alerts)),
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> Vec<Alert> {
        self.alerts.lock().unwrap().clone()
    }
}

impl AlertRepository for MockAlertRepo {
    async fn create(&self, alert: &Alert) -> Result<(), ApiError> {
        if self.fail_create {
            return Err(anyhow::anyhow!("alert store unavailable").into());
        }
        self.alerts.lock().unwrap().push(alert.clone());
        Ok(())
    }

    async fn record_sms_outcome(
        &self,
        id: Uuid,
        sms_sent: bool,
        sms_error: Option<&str>,
    ) -> Result<(), ApiError> {
        if self.fail_outcome {
            return Err(anyhow::anyhow!("alert store unavailable").into());
        }
        let mut alerts = self.alerts.lock().unwrap();
        if let Some(a) = alerts.iter_mut().find(|a| a.id == id) {
            a.sms_sent = sms_sent;
            a.sms_error = sms_error.map(str::to_owned);
        }
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Alert>, ApiError> {
        Ok(self.alerts.lock().unwrap().iter().find(|a| a.id == id).cloned())
    }

    async fn mark_read(&self, id: Uuid, read_at: DateTime<Utc>) -> Result<(), ApiError> {
        let mut alerts = self.alerts.lock().unwrap();
        if let Some(a) = alerts.iter_mut().find(|a| a.id == id && !a.read) {
            a.read = true;
            a.read_at = Some(read_at);
            *self.read_writes.lock().unwrap() += 1;
        }
        Ok(())
    }

    async fn list_for_user(&self, user_id: &str, limit: u64) -> Result<Vec<Alert>, ApiError> {
        let mut alerts: Vec<_> = self
            .alerts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        alerts.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));
        alerts.truncate(limit as usize);
        Ok(alerts)
    }

    async fn list_page(&self, page: PageRequest) -> Result<Vec<Alert>, ApiError> {
        let page = page.clamped();
        let mut alerts = self.snapshot();
        alerts.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));
        Ok(alerts
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect())
    }

    async fn count(&self) -> Result<u64, ApiError> {
        Ok(self.alerts.lock().unwrap().len() as u64)
    }
}

// ── MockVehicleRepo ──────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockVehicleRepo {
    pub vehicles: Arc<Mutex<Vec<Vehicle>>>,
    /// Every `count` passed to `sample_random`.
    pub sample_requests: Arc<Mutex<Vec<u64>>>,
}

impl MockVehicleRepo {
    pub fn new(vehicles: Vec<Vehicle>) -> Self {
        Self {
            vehicles: Arc::new(Mutex::new(vehicles)),
            ..Default::default()
        }
    }

    pub fn snapshot(&self) -> Vec<Vehicle> {
        self.vehicles.lock().unwrap().clone()
    }
}

impl VehicleRepository for MockVehicleRepo {
    async fn sample_random(&self, count: u64) -> Result<Vec<Vehicle>, ApiError> {
        self.sample_requests.lock().unwrap().push(count);
        // Deterministic stand-in for `ORDER BY RANDOM()`: newest first.
        let mut all = self.snapshot();
        all.reverse();
        all.truncate(count as usize);
        Ok(all)
    }

    async fn count(&self) -> Result<u64, ApiError> {
        Ok(self.vehicles.lock().unwrap().len() as u64)
    }

    async fn list_page(&self, page: PageRequest) -> Result<Vec<Vehicle>, ApiError> {
        let page = page.clamped();
        let mut all = self.snapshot();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect())
    }

    async fn find_by_vin(&self, vin: &str) -> Result<Option<Vehicle>, ApiError> {
        Ok(self.vehicles.lock().unwrap().iter().find(|v| v.vin == vin).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, ApiError> {
        Ok(self.vehicles.lock().unwrap().iter().find(|v| v.id == id).cloned())
    }

    async fn list_by_make(&self, make: &str) -> Result<Vec<Vehicle>, ApiError> {
        Ok(self
            .vehicles
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.make.as_deref() == Some(make))
            .cloned()
            .collect())
    }

    async fn create(&self, vehicle: &Vehicle) -> Result<(), ApiError> {
        self.vehicles.lock().unwrap().push(vehicle.clone());
        Ok(())
    }

    async fn update(&self, vehicle: &Vehicle) -> Result<(), ApiError> {
        let mut all = self.vehicles.lock().unwrap();
        if let Some(v) = all.iter_mut().find(|v| v.id == vehicle.id) {
            *v = vehicle.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let mut all = self.vehicles.lock().unwrap();
        let before = all.len();
        all.retain(|v| v.id != id);
        Ok(all.len() < before)
    }

    async fn insert_many(&self, vehicles: &[Vehicle]) -> Result<(), ApiError> {
        self.vehicles.lock().unwrap().extend_from_slice(vehicles);
        Ok(())
    }
}

// ── MockSms ──────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockSms {
    pub sent: Arc<Mutex<Vec<(String, String)>>>,
    pub fail_with: Option<SmsError>,
}

impl MockSms {
    pub fn failing(error: SmsError) -> Self {
        Self {
            fail_with: Some(error),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl SmsGateway for MockSms {
    async fn send(&self, to: &str, body: &str) -> Result<SmsReceipt, SmsError> {
        if let Some(e) = &self.fail_with {
            return Err(e.clone());
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_owned(), body.to_owned()));
        Ok(SmsReceipt {
            message_id: "SM-test".into(),
            to: to.to_owned(),
            status: Some("queued".into()),
        })
    }
}

// ── Notifiers ────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub events: Arc<Mutex<Vec<(String, Value)>>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<(String, Value)> {
        self.events.lock().unwrap().clone()
    }
}

impl RealtimeNotifier for RecordingNotifier {
    fn broadcast(&self, event: &str, payload: Value) -> Result<usize, NotifyError> {
        self.events
            .lock()
            .unwrap()
            .push((event.to_owned(), payload));
        Ok(1)
    }
}

pub struct FailingNotifier;

impl RealtimeNotifier for FailingNotifier {
    fn broadcast(&self, _event: &str, _payload: Value) -> Result<usize, NotifyError> {
        Err(NotifyError("socket layer down".into()))
    }
}

// ── MockListingSource ────────────────────────────────────────────────────────

pub struct MockListingSource {
    /// Makes whose fetch fails.
    pub failing: Vec<String>,
    pub per_make: usize,
}

impl ListingSource for MockListingSource {
    async fn search(&self, make: &str, limit: u32) -> Result<Vec<VehicleDraft>, anyhow::Error> {
        if self.failing.iter().any(|m| m == make) {
            anyhow::bail!("listing feed returned 429 for {make}");
        }
        Ok((0..self.per_make.min(limit as usize))
            .map(|i| VehicleDraft {
                vin: Some(format!("{make}-{i}")),
                make: Some(make.to_owned()),
                ..Default::default()
            })
            .collect())
    }
}

// ── MockPlaces ───────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockPlaces {
    pub results: Vec<NearbyDealership>,
    pub fail: bool,
    /// Every `(lat, lng, radius_m)` searched.
    pub searches: Arc<Mutex<Vec<(f64, f64, u32)>>>,
}

impl MockPlaces {
    pub fn new(results: Vec<NearbyDealership>) -> Self {
        Self {
            results,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

impl PlacesSearch for MockPlaces {
    async fn nearby_dealerships(
        &self,
        lat: f64,
        lng: f64,
        radius_m: u32,
    ) -> Result<Vec<NearbyDealership>, anyhow::Error> {
        self.searches.lock().unwrap().push((lat, lng, radius_m));
        if self.fail {
            anyhow::bail!("places search returned OVER_QUERY_LIMIT");
        }
        Ok(self.results.clone())
    }
}

pub fn nearby(name: &str) -> NearbyDealership {
    NearbyDealership {
        name: name.to_owned(),
        address: Some("1 Main St".into()),
        lat: 33.76,
        lon: -84.4,
        place_id: Some(format!("place-{name}")),
    }
}

// ── MockBackend ──────────────────────────────────────────────────────────────

pub struct MockBackend;

impl Backend for MockBackend {
    type Users = MockUserRepo;
    type Alerts = MockAlertRepo;
    type Vehicles = MockVehicleRepo;
    type Sms = MockSms;
    type Places = MockPlaces;
}

pub fn test_state(
    users: MockUserRepo,
    alerts: MockAlertRepo,
    vehicles: MockVehicleRepo,
    sms: MockSms,
) -> AppState<MockBackend> {
    AppState {
        users,
        alerts,
        vehicles,
        sms,
        places: MockPlaces::default(),
        verifier: Arc::new(CredentialVerifier::new(TEST_SECRET, None)),
        realtime: BroadcastHub::new(16),
    }
}

pub fn test_server(state: AppState<MockBackend>) -> TestServer {
    TestServer::new(build_router(state)).unwrap()
}

pub fn token(uid: &str) -> String {
    TestCredentials::default().issue(uid, &format!("{uid}@example.com"))
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn test_user(id: &str, role: Role, phone: Option<&str>) -> User {
    let now = Utc::now();
    User {
        id: id.to_owned(),
        email: format!("{id}@example.com"),
        name: format!("{id} name"),
        phone: phone.map(str::to_owned),
        role,
        created_at: now,
        updated_at: now,
    }
}

pub fn test_alert(user_id: &str, message: &str, age_secs: i64) -> Alert {
    Alert {
        id: Uuid::now_v7(),
        user_id: user_id.to_owned(),
        message: message.to_owned(),
        sent_by: "admin".into(),
        sent_at: Utc::now() - Duration::seconds(age_secs),
        read: false,
        read_at: None,
        sms_sent: false,
        sms_error: None,
    }
}

pub fn test_dealer(name: &str, city: &str, state: &str) -> Dealer {
    Dealer {
        name: Some(name.to_owned()),
        city: Some(city.to_owned()),
        state: Some(state.to_owned()),
        phone: Some("404-555-0100".into()),
        lat: Some(33.75),
        lng: Some(-84.39),
        ..Default::default()
    }
}

pub fn test_vehicle(vin: &str, make: &str, dealer: Option<Dealer>, age_secs: i64) -> Vehicle {
    let draft = VehicleDraft {
        make: Some(make.to_owned()),
        model: Some("Model".into()),
        price: Some(20_000.0),
        dealer,
        ..Default::default()
    };
    Vehicle::from_draft(
        Uuid::now_v7(),
        vin.to_owned(),
        draft,
        Utc::now() - Duration::seconds(age_secs),
    )
}
