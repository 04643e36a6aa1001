//! Content catalogue service.
//!
//! Every marketing table goes through [`ContentService`]; what differs per
//! table is the request body, described by a [`ContentForm`].

use std::sync::Arc;

use chrono::Utc;
use institute_common::{AppError, AppResult, id::IdGenerator};
use institute_db::{
    content::{ContentEntity, Visibility},
    repositories::{CategoryRepository, ContentRepository},
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Value};
use serde::de::DeserializeOwned;
use tracing::info;
use validator::Validate;

/// Request body that creates or replaces one row of a content table.
pub trait ContentForm: Validate + DeserializeOwned + Send + Sync + 'static {
    /// Table the form writes to.
    type Entity: ContentEntity;

    /// Active model produced by the form.
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity> + Send;

    /// Editable columns only. The id, timestamps and flags stay unset.
    fn into_active_model(self) -> Self::ActiveModel;

    /// Category the row points at, checked for existence before writing.
    fn category_id(&self) -> Option<&str> {
        None
    }

    /// Record who wrote the row, for tables that keep an author.
    fn stamp_author(_model: &mut Self::ActiveModel, _author_id: &str) {}
}

/// CRUD over one content table.
pub struct ContentService<F: ContentForm> {
    repo: ContentRepository<F::Entity>,
    categories: CategoryRepository,
    id_gen: IdGenerator,
}

impl<F: ContentForm> Clone for ContentService<F> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            categories: self.categories.clone(),
            id_gen: self.id_gen.clone(),
        }
    }
}

type Model<F> = <<F as ContentForm>::Entity as sea_orm::EntityTrait>::Model;

impl<F: ContentForm> ContentService<F> {
    /// Create a new content service.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            repo: ContentRepository::new(Arc::clone(&db)),
            categories: CategoryRepository::new(db),
            id_gen: IdGenerator::new(),
        }
    }

    /// Every row, newest first.
    pub async fn list(&self) -> AppResult<Vec<Model<F>>> {
        self.repo.list(false).await
    }

    /// Public rows only, newest first.
    pub async fn list_public(&self) -> AppResult<Vec<Model<F>>> {
        self.repo.list(true).await
    }

    /// Get a row by ID.
    pub async fn get(&self, id: &str) -> AppResult<Model<F>> {
        self.repo.get_by_id(id).await
    }

    async fn check_category(&self, form: &F) -> AppResult<()> {
        if let Some(category_id) = form.category_id()
            && self.categories.find_by_id(category_id).await?.is_none()
        {
            return Err(AppError::Validation(format!(
                "Category {category_id} does not exist"
            )));
        }
        Ok(())
    }

    /// Insert a row. Flags default to off unless `visibility` sets them.
    pub async fn create(
        &self,
        author_id: &str,
        form: F,
        visibility: Visibility,
    ) -> AppResult<Model<F>>
    where
        <F::Entity as EntityTrait>::Model: IntoActiveModel<F::ActiveModel>,
    {
        form.validate()?;
        self.check_category(&form).await?;

        let featured_column = <F::Entity as ContentEntity>::featured_column();
        if visibility.is_featured == Some(true) && featured_column.is_none() {
            return Err(AppError::Validation(format!(
                "{} cannot be featured",
                <F::Entity as ContentEntity>::LABEL
            )));
        }

        let id = self.id_gen.generate();
        let mut model = form.into_active_model();
        model.set(
            <F::Entity as ContentEntity>::id_column(),
            Value::from(id.clone()),
        );
        model.set(
            <F::Entity as ContentEntity>::created_at_column(),
            Value::from(Utc::now()),
        );
        model.set(
            <F::Entity as ContentEntity>::public_column(),
            Value::from(visibility.is_public.unwrap_or(false)),
        );
        if let Some(column) = featured_column {
            model.set(column, Value::from(visibility.is_featured.unwrap_or(false)));
        }
        F::stamp_author(&mut model, author_id);

        let created = self.repo.insert(&id, model).await?;
        info!(kind = <F::Entity as ContentEntity>::LABEL, id = %id, "Content created");
        Ok(created)
    }

    /// Replace the editable columns of a row. Flags are left alone.
    pub async fn update(&self, id: &str, form: F) -> AppResult<Model<F>> {
        form.validate()?;
        self.check_category(&form).await?;

        let updated = self.repo.update(id, form.into_active_model()).await?;
        info!(kind = <F::Entity as ContentEntity>::LABEL, id = %id, "Content updated");
        Ok(updated)
    }

    /// Store explicit flag values. Re-sending the same values is a no-op.
    pub async fn set_visibility(&self, id: &str, visibility: Visibility) -> AppResult<Model<F>> {
        let updated = self.repo.set_visibility(id, visibility).await?;
        info!(
            kind = <F::Entity as ContentEntity>::LABEL,
            id = %id,
            is_public = ?visibility.is_public,
            is_featured = ?visibility.is_featured,
            "Content visibility set"
        );
        Ok(updated)
    }

    /// Hard-delete a row.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.repo.delete(id).await?;
        info!(kind = <F::Entity as ContentEntity>::LABEL, id = %id, "Content deleted");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::forms::{CourseForm, FaqForm, TestimonialForm};
    use institute_db::entities::{
        category,
        course::{self, Difficulty},
        testimonial,
    };
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_course(id: &str) -> course::Model {
        course::Model {
            id: id.to_string(),
            title: "Data Science".to_string(),
            description: None,
            fees: 20_000,
            discount: None,
            category_id: Some("cat1".to_string()),
            difficulty: Difficulty::Intermediate,
            image_url: None,
            is_public: true,
            is_featured: false,
            created_at: Utc::now(),
        }
    }

    fn course_form(category_id: Option<&str>) -> CourseForm {
        CourseForm {
            title: "Data Science".to_string(),
            description: None,
            fees: 20_000,
            discount: None,
            category_id: category_id.map(str::to_string),
            difficulty: Difficulty::Intermediate,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_create_with_unknown_category_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<category::Model>::new()])
            .into_connection();
        let service = ContentService::<CourseForm>::new(Arc::new(db));

        let result = service
            .create("admin", course_form(Some("ghost")), Visibility::default())
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_course() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[category::Model {
                id: "cat1".to_string(),
                title: "Analytics".to_string(),
                created_at: Utc::now(),
            }]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([[create_test_course("c1")]])
            .into_connection();
        let service = ContentService::<CourseForm>::new(Arc::new(db));

        let created = service
            .create(
                "admin",
                course_form(Some("cat1")),
                Visibility {
                    is_public: Some(true),
                    is_featured: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(created.id, "c1");
        assert!(created.is_public);
    }

    #[tokio::test]
    async fn test_faq_cannot_be_created_featured() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = ContentService::<FaqForm>::new(Arc::new(db));

        let form = FaqForm {
            question: "Do you offer weekend batches?".to_string(),
            answer: "Yes.".to_string(),
        };
        let result = service
            .create(
                "admin",
                form,
                Visibility {
                    is_public: Some(true),
                    is_featured: Some(true),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_set_visibility_is_idempotent() {
        let featured = testimonial::Model {
            id: "t1".to_string(),
            name: "Ravi".to_string(),
            designation: None,
            message: "Great mentors".to_string(),
            image_url: None,
            is_public: true,
            is_featured: true,
            created_at: Utc::now(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
            ])
            .append_query_results([[featured.clone()], [featured]])
            .into_connection();
        let service = ContentService::<TestimonialForm>::new(Arc::new(db));

        let visibility = Visibility {
            is_public: None,
            is_featured: Some(true),
        };
        let first = service.set_visibility("t1", visibility).await.unwrap();
        let second = service.set_visibility("t1", visibility).await.unwrap();

        assert_eq!(first, second);
        assert!(second.is_featured);
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let service = ContentService::<CourseForm>::new(Arc::new(db));

        let result = service.update("ghost", course_form(None)).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
