use std::sync::Arc;

use sea_orm::DatabaseConnection;

use autovault_auth_types::token::CredentialVerifier;

use crate::domain::repository::{
    AlertRepository, PlacesSearch, SmsGateway, UserRepository, VehicleRepository,
};
use crate::infra::db::{DbAlertRepository, DbUserRepository, DbVehicleRepository};
use crate::infra::places::GooglePlacesClient;
use crate::infra::realtime::BroadcastHub;
use crate::infra::sms::TwilioSmsGateway;

/// Set of adapters the handlers run against.
///
/// Production wires [`PostgresBackend`]; tests plug in in-memory doubles.
pub trait Backend: Send + Sync + 'static {
    type Users: UserRepository + Clone + 'static;
    type Alerts: AlertRepository + Clone + 'static;
    type Vehicles: VehicleRepository + Clone + 'static;
    type Sms: SmsGateway + Clone + 'static;
    type Places: PlacesSearch + Clone + 'static;
}

pub struct PostgresBackend;

impl Backend for PostgresBackend {
    type Users = DbUserRepository;
    type Alerts = DbAlertRepository;
    type Vehicles = DbVehicleRepository;
    type Sms = TwilioSmsGateway;
    type Places = GooglePlacesClient;
}

/// Shared application state passed to every handler via axum `State`.
pub struct AppState<B: Backend> {
    pub users: B::Users,
    pub alerts: B::Alerts,
    pub vehicles: B::Vehicles,
    pub sms: B::Sms,
    pub places: B::Places,
    pub verifier: Arc<CredentialVerifier>,
    pub realtime: BroadcastHub,
}

impl<B: Backend> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
            alerts: self.alerts.clone(),
            vehicles: self.vehicles.clone(),
            sms: self.sms.clone(),
            places: self.places.clone(),
            verifier: Arc::clone(&self.verifier),
            realtime: self.realtime.clone(),
        }
    }
}

impl AppState<PostgresBackend> {
    pub fn postgres(
        db: DatabaseConnection,
        verifier: CredentialVerifier,
        sms: TwilioSmsGateway,
        places: GooglePlacesClient,
        realtime: BroadcastHub,
    ) -> Self {
        Self {
            users: DbUserRepository { db: db.clone() },
            alerts: DbAlertRepository { db: db.clone() },
            vehicles: DbVehicleRepository { db },
            sms,
            places,
            verifier: Arc::new(verifier),
            realtime,
        }
    }
}
