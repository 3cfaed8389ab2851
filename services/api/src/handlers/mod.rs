pub mod alert;
pub mod auth;
pub mod realtime;
pub mod user;
pub mod vehicle;

use axum::extract::FromRequest;
use serde::{Deserialize, Serialize};

use autovault_domain::pagination::PageRequest;

use crate::error::ApiError;

/// `axum::Json` whose rejection renders as an [`ApiError`] body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// `?page=&limit=` as sent by browsers. Bad values fall back to defaults
/// instead of rejecting the request.
#[derive(Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageQuery {
    pub fn to_page_request(&self) -> PageRequest {
        let default = PageRequest::default();
        PageRequest {
            page: positive(self.page.as_deref()).unwrap_or(default.page),
            limit: positive(self.limit.as_deref()).unwrap_or(default.limit),
        }
        .clamped()
    }
}

/// Lenient positive integer from a query string: anything unparsable or
/// non-positive yields `None` so the caller can fall back to its default.
pub(crate) fn positive<T>(raw: Option<&str>) -> Option<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    raw.and_then(|v| v.trim().parse::<T>().ok())
        .filter(|v| *v > T::default())
}
