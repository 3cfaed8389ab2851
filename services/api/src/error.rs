use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use autovault_core::error::error_response;

/// Service error variants. Every handler and extractor rejects with this type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("vehicle has no dealer information")]
    MissingDealer,
    #[error("car location not available")]
    LocationUnavailable,
    #[error("no token provided")]
    MissingCredential,
    #[error("unauthorized")]
    InvalidCredential,
    #[error("admin or manager role required")]
    ElevatedRoleRequired,
    #[error("access denied")]
    AlertAccessDenied,
    #[error("user not found")]
    UserNotFound,
    #[error("alert not found")]
    AlertNotFound,
    #[error("car not found")]
    VehicleNotFound,
    #[error("no cars found in database")]
    NoVehicles,
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::MissingDealer => "MISSING_DEALER",
            Self::LocationUnavailable => "LOCATION_UNAVAILABLE",
            Self::MissingCredential => "MISSING_CREDENTIAL",
            Self::InvalidCredential => "INVALID_CREDENTIAL",
            Self::ElevatedRoleRequired => "ELEVATED_ROLE_REQUIRED",
            Self::AlertAccessDenied => "ALERT_ACCESS_DENIED",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::AlertNotFound => "ALERT_NOT_FOUND",
            Self::VehicleNotFound => "VEHICLE_NOT_FOUND",
            Self::NoVehicles => "NO_VEHICLES",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidArgument(_) | Self::MissingDealer | Self::LocationUnavailable => {
                StatusCode::BAD_REQUEST
            }
            Self::MissingCredential => StatusCode::UNAUTHORIZED,
            Self::InvalidCredential | Self::ElevatedRoleRequired | Self::AlertAccessDenied => {
                StatusCode::FORBIDDEN
            }
            Self::UserNotFound | Self::AlertNotFound | Self::VehicleNotFound | Self::NoVehicles => {
                StatusCode::NOT_FOUND
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidArgument(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Log 500s only. TraceLayer already records method, uri and status for all
        // requests. 4xx are expected client errors.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %format!("{e:#}"), kind = "INTERNAL", "internal error");
        }
        error_response(self.status(), self.kind(), self.to_string())
    }
}
