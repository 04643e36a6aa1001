//! Content repository, shared by the public marketing tables.

use std::{marker::PhantomData, sync::Arc};

use chrono::{DateTime, Utc};
use institute_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, SqlErr, sea_query::Expr,
};

use crate::content::{ContentEntity, Visibility};

/// Repository over one content table.
pub struct ContentRepository<K> {
    db: Arc<DatabaseConnection>,
    _kind: PhantomData<fn() -> K>,
}

impl<K> Clone for ContentRepository<K> {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
            _kind: PhantomData,
        }
    }
}

/// Map a failed write, reporting unique violations as conflicts.
fn write_error<K: ContentEntity>(err: &DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict(format!("{} already exists", K::LABEL))
        }
        _ => AppError::Database(err.to_string()),
    }
}

impl<K: ContentEntity> ContentRepository<K> {
    /// Create a new content repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            _kind: PhantomData,
        }
    }

    fn not_found(id: &str) -> AppError {
        AppError::NotFound(format!("{} {id}", K::LABEL))
    }

    /// Find a row by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<K::Model>> {
        K::find()
            .filter(K::id_column().eq(id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a row by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<K::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    /// All rows, newest first. `public_only` hides unpublished rows.
    pub async fn list(&self, public_only: bool) -> AppResult<Vec<K::Model>> {
        let mut query = K::find();
        if public_only {
            query = query.filter(K::public_column().eq(true));
        }

        query
            .order_by_desc(K::created_at_column())
            .order_by_desc(K::id_column())
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count every row.
    pub async fn count(&self) -> AppResult<u64> {
        K::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count published rows.
    pub async fn count_public(&self) -> AppResult<u64> {
        K::find()
            .filter(K::public_column().eq(true))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count featured rows. Always zero for tables without the flag.
    pub async fn count_featured(&self) -> AppResult<u64> {
        let Some(featured) = K::featured_column() else {
            return Ok(0);
        };

        K::find()
            .filter(featured.eq(true))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Creation timestamps of rows created in `[from, to)`.
    pub async fn created_at_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<DateTime<Utc>>> {
        K::find()
            .select_only()
            .column(K::created_at_column())
            .filter(K::created_at_column().gte(from))
            .filter(K::created_at_column().lt(to))
            .into_tuple::<DateTime<Utc>>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a new row with primary key `id` and return it.
    pub async fn insert<A>(&self, id: &str, model: A) -> AppResult<K::Model>
    where
        A: ActiveModelTrait<Entity = K> + Send,
        K::Model: IntoActiveModel<A>,
    {
        K::insert(model)
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| write_error::<K>(&e))?;

        self.get_by_id(id).await
    }

    /// Write the set fields of `model` to row `id` and return the new row.
    pub async fn update<A>(&self, id: &str, model: A) -> AppResult<K::Model>
    where
        A: ActiveModelTrait<Entity = K> + Send,
    {
        let result = K::update_many()
            .set(model)
            .filter(K::id_column().eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| write_error::<K>(&e))?;

        if result.rows_affected == 0 {
            return Err(Self::not_found(id));
        }

        self.get_by_id(id).await
    }

    /// Store explicit `isPublic` / `isFeatured` values.
    pub async fn set_visibility(&self, id: &str, visibility: Visibility) -> AppResult<K::Model> {
        let mut update = K::update_many().filter(K::id_column().eq(id));

        if let Some(is_public) = visibility.is_public {
            update = update.col_expr(K::public_column(), Expr::value(is_public));
        }
        if let Some(is_featured) = visibility.is_featured {
            let column = K::featured_column().ok_or_else(|| {
                AppError::Validation(format!("{} cannot be featured", K::LABEL))
            })?;
            update = update.col_expr(column, Expr::value(is_featured));
        }

        if visibility.is_empty() {
            return self.get_by_id(id).await;
        }

        let result = update
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(Self::not_found(id));
        }

        self.get_by_id(id).await
    }

    /// Hard-delete a row.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let result = K::delete_many()
            .filter(K::id_column().eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(Self::not_found(id));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::{Blog, Faq, blog, faq};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};

    fn create_test_blog(id: &str, is_public: bool) -> blog::Model {
        blog::Model {
            id: id.to_string(),
            title: "Why learn Rust".to_string(),
            slug: format!("why-learn-rust-{id}"),
            excerpt: None,
            content: "<p>Because.</p>".to_string(),
            image_url: None,
            author_id: None,
            is_public,
            is_featured: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_list_public_only() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_blog("b1", true)]])
                .into_connection(),
        );

        let repo = ContentRepository::<Blog>::new(db);
        let blogs = repo.list(true).await.unwrap();

        assert_eq!(blogs.len(), 1);
        assert!(blogs[0].is_public);
    }

    #[tokio::test]
    async fn test_set_visibility_refetches_row() {
        let mut blog = create_test_blog("b1", false);
        blog.is_featured = true;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[blog.clone()]])
                .into_connection(),
        );

        let repo = ContentRepository::<Blog>::new(db);
        let updated = repo
            .set_visibility(
                "b1",
                Visibility {
                    is_public: None,
                    is_featured: Some(true),
                },
            )
            .await
            .unwrap();

        assert!(updated.is_featured);
    }

    #[tokio::test]
    async fn test_faq_cannot_be_featured() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = ContentRepository::<Faq>::new(db);
        let result = repo
            .set_visibility(
                "f1",
                Visibility {
                    is_public: Some(true),
                    is_featured: Some(true),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_count_featured_without_column_is_zero() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = ContentRepository::<Faq>::new(db);
        assert_eq!(repo.count_featured().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_count_public() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => Value::BigInt(Some(2))
                }]])
                .into_connection(),
        );

        let repo = ContentRepository::<Faq>::new(db);
        assert_eq!(repo.count_public().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = ContentRepository::<Blog>::new(db);
        let changes = blog::ActiveModel {
            title: sea_orm::Set("Renamed".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            repo.update("missing", changes).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_row_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = ContentRepository::<faq::Entity>::new(db);
        match repo.delete("missing").await {
            Err(AppError::NotFound(what)) => assert_eq!(what, "FAQ missing"),
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }
}
