use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use autovault_domain::role::Role;

use crate::domain::types::User;
use crate::error::ApiError;
use crate::handlers::ApiJson;
use crate::identity::Authenticated;
use crate::state::{AppState, Backend};
use crate::usecase::auth::{GetProfileUseCase, RegisterInput, RegisterUseCase};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub uid: String,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: Role,
    #[serde(serialize_with = "autovault_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "autovault_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id.clone(),
            uid: u.id,
            email: u.email,
            name: u.name,
            phone: u.phone,
            role: u.role,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

// ── POST /api/auth/verify-token ──────────────────────────────────────────────

#[derive(Serialize)]
pub struct IdentityResponse {
    pub uid: String,
    pub email: Option<String>,
    pub role: Role,
}

#[derive(Serialize)]
pub struct VerifyTokenResponse {
    pub user: IdentityResponse,
}

pub async fn verify_token(Authenticated(caller): Authenticated) -> Json<VerifyTokenResponse> {
    Json(VerifyTokenResponse {
        user: IdentityResponse {
            uid: caller.uid,
            email: caller.email,
            role: caller.role,
        },
    })
}

// ── POST /api/auth/register ──────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub id_token: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user: UserResponse,
}

pub async fn register<B: Backend>(
    State(state): State<AppState<B>>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let usecase = RegisterUseCase {
        verifier: state.verifier.clone(),
        users: state.users.clone(),
    };
    let user = usecase
        .execute(RegisterInput {
            id_token: body.id_token,
            name: body.name,
            phone: body.phone,
            role: body.role,
        })
        .await?;
    Ok(Json(RegisterResponse {
        message: "User registered successfully",
        user: user.into(),
    }))
}

// ── GET /api/auth/profile ────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ProfileResponse {
    pub user: UserResponse,
}

pub async fn get_profile<B: Backend>(
    Authenticated(caller): Authenticated,
    State(state): State<AppState<B>>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let usecase = GetProfileUseCase {
        users: state.users.clone(),
    };
    let user = usecase.execute(&caller.uid).await?;
    Ok(Json(ProfileResponse { user: user.into() }))
}
