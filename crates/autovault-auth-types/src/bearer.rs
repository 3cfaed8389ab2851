//! `Authorization: Bearer <credential>` parsing.

use http::HeaderMap;
use http::header::AUTHORIZATION;

/// The request carried no usable bearer credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BearerError {
    #[error("no token provided")]
    Missing,
    #[error("malformed authorization header")]
    Malformed,
}

/// Extract the credential from an `Authorization` header value.
pub fn parse_bearer(value: Option<&str>) -> Result<&str, BearerError> {
    let value = value.ok_or(BearerError::Missing)?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or(BearerError::Malformed)?
        .trim();
    if token.is_empty() || token.contains(' ') {
        return Err(BearerError::Malformed);
    }
    Ok(token)
}

/// Read the `Authorization` header and return an owned credential.
///
/// A header that is not valid visible ASCII is treated as malformed.
pub fn bearer_from_headers(headers: &HeaderMap) -> Result<String, BearerError> {
    let value = match headers.get(AUTHORIZATION) {
        None => None,
        Some(v) => Some(v.to_str().map_err(|_| BearerError::Malformed)?),
    };
    parse_bearer(value).map(str::to_owned)
}
