use axum::{Json, extract::State};

use crate::error::ApiError;
use crate::handlers::auth::UserResponse;
use crate::identity::Elevated;
use crate::state::{AppState, Backend};
use crate::usecase::user::ListUsersUseCase;

// ── GET /api/users ───────────────────────────────────────────────────────────

pub async fn list_users<B: Backend>(
    _caller: Elevated,
    State(state): State<AppState<B>>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let usecase = ListUsersUseCase {
        users: state.users.clone(),
    };
    let users = usecase.execute().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}
