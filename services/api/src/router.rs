use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use autovault_core::error::route_not_found;
use autovault_core::health::health;
use autovault_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    alert::{get_all_alerts, get_my_alerts, mark_alert_read, send_alert},
    auth::{get_profile, register, verify_token},
    realtime::realtime_socket,
    user::list_users,
    vehicle::{
        add_car, delete_car, get_car_by_vin, get_car_dealerships, get_nearby_dealerships,
        get_random_cars, list_cars, update_car,
    },
};
use crate::state::{AppState, Backend};

pub fn build_router<B: Backend>(state: AppState<B>) -> Router {
    Router::new()
        // Health
        .route("/api/health", get(health))
        // Auth
        .route("/api/auth/verify-token", post(verify_token))
        .route("/api/auth/register", post(register::<B>))
        .route("/api/auth/profile", get(get_profile::<B>))
        // Cars
        .route("/api/cars/random", get(get_random_cars::<B>))
        .route("/api/cars/vin/{vin}", get(get_car_by_vin::<B>))
        .route("/api/cars/{key}/dealerships", get(get_car_dealerships::<B>))
        .route(
            "/api/cars/{key}/nearby-dealerships",
            get(get_nearby_dealerships::<B>),
        )
        .route("/api/cars", get(list_cars::<B>).post(add_car::<B>))
        .route("/api/cars/{key}", put(update_car::<B>).delete(delete_car::<B>))
        // Alerts
        .route("/api/alerts", get(get_my_alerts::<B>).post(send_alert::<B>))
        .route("/api/alerts/all", get(get_all_alerts::<B>))
        .route("/api/alerts/{id}/read", put(mark_alert_read::<B>))
        // Users
        .route("/api/users", get(list_users::<B>))
        // Realtime
        .route("/ws", get(realtime_socket::<B>))
        .fallback(route_not_found)
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
