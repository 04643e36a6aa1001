//! Staff directory.

use institute_common::{AppError, AppResult};
use institute_db::entities::user::{self, UserRole};
use institute_db::repositories::UserRepository;
use serde::Deserialize;

/// Query of the assignee picker.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaffQuery {
    pub role: Option<String>,
}

/// Service for looking up staff accounts.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    /// Non-banned staff, optionally of one role.
    pub async fn list_staff(&self, query: &StaffQuery) -> AppResult<Vec<user::Model>> {
        let role = match query.role.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => {
                let role = UserRole::parse(raw)
                    .ok_or_else(|| AppError::Validation(format!("Unknown role: {raw}")))?;
                if !role.is_staff() {
                    return Err(AppError::Validation(format!(
                        "{} is not a staff role",
                        role.as_str()
                    )));
                }
                Some(role)
            }
        };

        self.user_repo.find_active_staff(role).await
    }
}
