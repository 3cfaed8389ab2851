//! Request extractors that resolve and gate the caller.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use autovault_auth_types::bearer::{BearerError, bearer_from_headers};
use autovault_domain::access::AccessPolicy;

use crate::domain::types::Caller;
use crate::error::ApiError;
use crate::state::{AppState, Backend};
use crate::usecase::auth::{AuthenticateUseCase, authorize};

/// Any caller whose bearer credential verifies.
///
/// 401 when the header is absent or malformed, 403 when the credential is
/// rejected. The role is looked up fresh on every request.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Caller);

/// Caller holding the `manager` or `admin` role. 403 otherwise.
#[derive(Debug, Clone)]
pub struct Elevated(pub Caller);

impl<B: Backend> FromRequestParts<AppState<B>> for Authenticated {
    type Rejection = ApiError;

    // Extract synchronously and return a 'static future; see `axum-core`'s
    // `fn -> impl Future + Send` signature.
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<B>,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = bearer_from_headers(&parts.headers);
        let usecase = AuthenticateUseCase {
            verifier: Arc::clone(&state.verifier),
            users: state.users.clone(),
        };
        async move {
            let token = token.map_err(|e| match e {
                BearerError::Missing | BearerError::Malformed => ApiError::MissingCredential,
            })?;
            let caller = usecase.execute(&token).await?;
            authorize(&caller, AccessPolicy::Authenticated)?;
            Ok(Self(caller))
        }
    }
}

impl<B: Backend> FromRequestParts<AppState<B>> for Elevated {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<B>,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let authenticated = Authenticated::from_request_parts(parts, state);
        async move {
            let Authenticated(caller) = authenticated.await?;
            authorize(&caller, AccessPolicy::Elevated)?;
            Ok(Self(caller))
        }
    }
}
