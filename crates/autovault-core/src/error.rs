use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Error body written by every AutoVault endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub kind: &'a str,
    pub error: String,
}

/// Build a JSON error response.
///
/// Does not log: callers log the underlying cause of 5xx before it is
/// flattened into `message`.
pub fn error_response(status: StatusCode, kind: &str, message: String) -> Response {
    (status, axum::Json(ErrorBody { kind, error: message })).into_response()
}

/// Router fallback for unknown paths.
pub async fn route_not_found() -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        "ROUTE_NOT_FOUND",
        "route not found".to_owned(),
    )
}
