use std::sync::Arc;

use chrono::Utc;

use autovault_auth_types::token::CredentialVerifier;
use autovault_domain::access::AccessPolicy;
use autovault_domain::role::Role;

use crate::domain::repository::UserRepository;
use crate::domain::types::{Caller, User};
use crate::error::ApiError;

// ── Authenticate ─────────────────────────────────────────────────────────────

/// Resolves a bearer credential to a [`Caller`].
///
/// The role is read from the user record on every call so that role changes
/// apply to the very next request. A subject without a record is a `user`.
pub struct AuthenticateUseCase<U: UserRepository> {
    pub verifier: Arc<CredentialVerifier>,
    pub users: U,
}

impl<U: UserRepository> AuthenticateUseCase<U> {
    pub async fn execute(&self, token: &str) -> Result<Caller, ApiError> {
        let credential = self.verifier.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "credential rejected");
            ApiError::InvalidCredential
        })?;
        let role = self
            .users
            .find_by_id(&credential.uid)
            .await?
            .map(|u| u.role)
            .unwrap_or_default();
        Ok(Caller {
            uid: credential.uid,
            email: credential.email,
            role,
        })
    }
}

/// Gate a resolved caller on a route's access policy.
pub fn authorize(caller: &Caller, policy: AccessPolicy) -> Result<(), ApiError> {
    if policy.permits(caller.role) {
        Ok(())
    } else {
        Err(ApiError::ElevatedRoleRequired)
    }
}

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub id_token: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
}

/// Writes the user record for a verified credential, overwriting any
/// existing record for the same subject.
pub struct RegisterUseCase<U: UserRepository> {
    pub verifier: Arc<CredentialVerifier>,
    pub users: U,
}

impl<U: UserRepository> RegisterUseCase<U> {
    pub async fn execute(&self, input: RegisterInput) -> Result<User, ApiError> {
        if input.id_token.trim().is_empty() {
            return Err(ApiError::invalid("idToken is required"));
        }
        let role = match input.role.as_deref().map(str::trim) {
            None | Some("") => Role::User,
            Some(raw) => raw
                .parse::<Role>()
                .map_err(|e| ApiError::invalid(e.to_string()))?,
        };
        let credential = self
            .verifier
            .verify(input.id_token.trim())
            .map_err(|_| ApiError::InvalidCredential)?;
        let email = credential
            .email
            .filter(|e| !e.is_empty())
            .ok_or_else(|| ApiError::invalid("credential carries no email"))?;
        let name = non_empty(input.name)
            .or(non_empty(credential.name))
            .unwrap_or_default();

        let now = Utc::now();
        let user = User {
            id: credential.uid,
            email,
            name,
            phone: non_empty(input.phone),
            role,
            created_at: now,
            updated_at: now,
        };
        let saved = self.users.upsert(&user).await?;
        tracing::info!(user_id = %saved.id, role = %saved.role, "user registered");
        Ok(saved)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

// ── GetProfile ───────────────────────────────────────────────────────────────

pub struct GetProfileUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> GetProfileUseCase<U> {
    pub async fn execute(&self, uid: &str) -> Result<User, ApiError> {
        self.users
            .find_by_id(uid)
            .await?
            .ok_or(ApiError::UserNotFound)
    }
}
