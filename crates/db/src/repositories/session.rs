//! Session repository.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use institute_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::entities::{Session, User, session, user};

/// Session repository for database operations.
#[derive(Clone)]
pub struct SessionRepository {
    db: Arc<DatabaseConnection>,
}

impl SessionRepository {
    /// Create a new session repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the owner of a token whose session has not expired at `now`.
    pub async fn find_user_by_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<user::Model>> {
        let found = Session::find()
            .filter(session::Column::Token.eq(token))
            .filter(session::Column::ExpiresAt.gt(now))
            .find_also_related(User)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(found.and_then(|(_, user)| user))
    }

    /// Remove sessions that expired before `now`.
    pub async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = Session::delete_many()
            .filter(session::Column::ExpiresAt.lte(now))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::user::UserRole;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn session_and_user() -> (session::Model, user::Model) {
        let now = Utc::now();
        (
            session::Model {
                id: "s1".to_string(),
                token: "tok".to_string(),
                user_id: "u1".to_string(),
                expires_at: now + chrono::Duration::hours(1),
                created_at: now,
            },
            user::Model {
                id: "u1".to_string(),
                name: "Admin".to_string(),
                email: "admin@example.com".to_string(),
                role: UserRole::Admin,
                banned: false,
                created_at: now,
            },
        )
    }

    #[tokio::test]
    async fn test_find_user_by_token() {
        let (session, user) = session_and_user();

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[(session, Some(user.clone()))]])
                .into_connection(),
        );

        let repo = SessionRepository::new(db);
        let found = repo.find_user_by_token("tok", Utc::now()).await.unwrap();

        assert_eq!(found, Some(user));
    }

    #[tokio::test]
    async fn test_unknown_token_resolves_to_none() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<(session::Model, Option<user::Model>)>::new()])
                .into_connection(),
        );

        let repo = SessionRepository::new(db);
        let found = repo.find_user_by_token("missing", Utc::now()).await.unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_delete_expired() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 3,
                }])
                .into_connection(),
        );

        let repo = SessionRepository::new(db);
        assert_eq!(repo.delete_expired(Utc::now()).await.unwrap(), 3);
    }
}
