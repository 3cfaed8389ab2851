use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use autovault_domain::pagination::Pagination;

use crate::domain::types::{Dealership, NearbyDealership, Vehicle, VehicleDraft};
use crate::error::ApiError;
use crate::handlers::{ApiJson, MessageResponse, PageQuery, positive};
use crate::identity::{Authenticated, Elevated};
use crate::state::{AppState, Backend};
use crate::usecase::vehicle::{
    AddVehicleUseCase, DEFAULT_RANDOM_COUNT, DEFAULT_SEARCH_RADIUS_M, DeleteVehicleUseCase,
    GetDealershipsUseCase, GetNearbyDealershipsUseCase, GetRandomVehiclesUseCase,
    GetVehicleByVinUseCase, ListVehiclesUseCase, UpdateVehicleUseCase,
};

fn parse_vehicle_id(raw: &str) -> Result<Uuid, ApiError> {
    raw.parse().map_err(|_| ApiError::VehicleNotFound)
}

// ── GET /api/cars/random ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RandomQuery {
    pub count: Option<String>,
}

pub async fn get_random_cars<B: Backend>(
    _caller: Authenticated,
    State(state): State<AppState<B>>,
    Query(query): Query<RandomQuery>,
) -> Result<Json<Vec<Vehicle>>, ApiError> {
    let count = positive(query.count.as_deref()).unwrap_or(DEFAULT_RANDOM_COUNT);
    let usecase = GetRandomVehiclesUseCase {
        vehicles: state.vehicles.clone(),
    };
    Ok(Json(usecase.execute(count).await?))
}

// ── GET /api/cars/vin/{vin} ──────────────────────────────────────────────────

pub async fn get_car_by_vin<B: Backend>(
    _caller: Authenticated,
    State(state): State<AppState<B>>,
    Path(vin): Path<String>,
) -> Result<Json<Vehicle>, ApiError> {
    let usecase = GetVehicleByVinUseCase {
        vehicles: state.vehicles.clone(),
    };
    Ok(Json(usecase.execute(&vin).await?))
}

// ── GET /api/cars/{vin}/dealerships ──────────────────────────────────────────

pub async fn get_car_dealerships<B: Backend>(
    _caller: Authenticated,
    State(state): State<AppState<B>>,
    Path(vin): Path<String>,
) -> Result<Json<Vec<Dealership>>, ApiError> {
    let usecase = GetDealershipsUseCase {
        vehicles: state.vehicles.clone(),
    };
    Ok(Json(usecase.execute(&vin).await?))
}

// ── GET /api/cars/{vin}/nearby-dealerships ───────────────────────────────────

#[derive(Deserialize)]
pub struct RadiusQuery {
    pub radius: Option<String>,
}

pub async fn get_nearby_dealerships<B: Backend>(
    _caller: Authenticated,
    State(state): State<AppState<B>>,
    Path(vin): Path<String>,
    Query(query): Query<RadiusQuery>,
) -> Result<Json<Vec<NearbyDealership>>, ApiError> {
    let radius = positive(query.radius.as_deref()).unwrap_or(DEFAULT_SEARCH_RADIUS_M);
    let usecase = GetNearbyDealershipsUseCase {
        vehicles: state.vehicles.clone(),
        places: state.places.clone(),
    };
    Ok(Json(usecase.execute(&vin, radius).await?))
}

// ── GET /api/cars ────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CarsResponse {
    pub cars: Vec<Vehicle>,
    pub pagination: Pagination,
}

pub async fn list_cars<B: Backend>(
    _caller: Elevated,
    State(state): State<AppState<B>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<CarsResponse>, ApiError> {
    let usecase = ListVehiclesUseCase {
        vehicles: state.vehicles.clone(),
    };
    let page = usecase.execute(query.to_page_request()).await?;
    Ok(Json(CarsResponse {
        cars: page.cars,
        pagination: page.pagination,
    }))
}

// ── POST /api/cars ───────────────────────────────────────────────────────────

pub async fn add_car<B: Backend>(
    _caller: Elevated,
    State(state): State<AppState<B>>,
    ApiJson(draft): ApiJson<VehicleDraft>,
) -> Result<(StatusCode, Json<Vehicle>), ApiError> {
    let usecase = AddVehicleUseCase {
        vehicles: state.vehicles.clone(),
    };
    let vehicle = usecase.execute(draft).await?;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

// ── PUT /api/cars/{id} ───────────────────────────────────────────────────────

pub async fn update_car<B: Backend>(
    _caller: Elevated,
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
    ApiJson(draft): ApiJson<VehicleDraft>,
) -> Result<Json<Vehicle>, ApiError> {
    let id = parse_vehicle_id(&id)?;
    let usecase = UpdateVehicleUseCase {
        vehicles: state.vehicles.clone(),
    };
    Ok(Json(usecase.execute(id, draft).await?))
}

// ── DELETE /api/cars/{id} ────────────────────────────────────────────────────

pub async fn delete_car<B: Backend>(
    _caller: Elevated,
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_vehicle_id(&id)?;
    let usecase = DeleteVehicleUseCase {
        vehicles: state.vehicles.clone(),
    };
    usecase.execute(id).await?;
    Ok(Json(MessageResponse {
        message: "Car deleted successfully",
    }))
}
