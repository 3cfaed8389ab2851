use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::ApiError;

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> ListUsersUseCase<U> {
    pub async fn execute(&self) -> Result<Vec<User>, ApiError> {
        self.users.list_all().await
    }
}
