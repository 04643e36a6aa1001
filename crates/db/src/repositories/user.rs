//! User repository.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use institute_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

use crate::entities::{
    User,
    user::{self, UserRole},
};

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<user::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {id}")))
    }

    /// Find users by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<user::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        User::find()
            .filter(user::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new user.
    pub async fn create(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Non-banned staff, optionally restricted to one role, sorted by name.
    pub async fn find_active_staff(&self, role: Option<UserRole>) -> AppResult<Vec<user::Model>> {
        let mut query = User::find()
            .filter(user::Column::Banned.eq(false))
            .filter(user::Column::Role.ne(UserRole::Student));

        if let Some(role) = role {
            query = query.filter(user::Column::Role.eq(role));
        }

        query
            .order_by_asc(user::Column::Name)
            .order_by_asc(user::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count non-banned students created in `[from, to)`.
    pub async fn count_students_created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<u64> {
        User::find()
            .filter(user::Column::Role.eq(UserRole::Student))
            .filter(user::Column::Banned.eq(false))
            .filter(user::Column::CreatedAt.gte(from))
            .filter(user::Column::CreatedAt.lt(to))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count non-banned students.
    pub async fn count_students(&self) -> AppResult<u64> {
        User::find()
            .filter(user::Column::Role.eq(UserRole::Student))
            .filter(user::Column::Banned.eq(false))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Number of accounts per role. Roles without accounts are absent.
    pub async fn count_by_role(&self) -> AppResult<Vec<(UserRole, i64)>> {
        User::find()
            .select_only()
            .column(user::Column::Role)
            .column_as(user::Column::Id.count(), "count")
            .group_by(user::Column::Role)
            .into_tuple::<(UserRole, i64)>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Creation timestamps of accounts created in `[from, to)`.
    pub async fn created_at_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<DateTime<Utc>>> {
        User::find()
            .select_only()
            .column(user::Column::CreatedAt)
            .filter(user::Column::CreatedAt.gte(from))
            .filter(user::Column::CreatedAt.lt(to))
            .into_tuple::<DateTime<Utc>>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
