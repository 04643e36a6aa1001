//! Course category service.

use chrono::Utc;
use institute_common::{AppError, AppResult, id::IdGenerator};
use institute_db::entities::category;
use institute_db::repositories::CategoryRepository;
use sea_orm::Set;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

/// Category create/rename body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CategoryInput {
    #[validate(length(min = 1, max = 128))]
    pub title: String,
}

/// Service for managing course categories.
#[derive(Clone)]
pub struct CategoryService {
    category_repo: CategoryRepository,
    id_gen: IdGenerator,
}

impl CategoryService {
    /// Create a new category service.
    #[must_use]
    pub const fn new(category_repo: CategoryRepository) -> Self {
        Self {
            category_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// All categories by title.
    pub async fn list(&self) -> AppResult<Vec<category::Model>> {
        self.category_repo.find_all().await
    }

    /// Fail with a conflict if another category already uses `title`.
    async fn ensure_title_free(&self, title: &str, except_id: Option<&str>) -> AppResult<()> {
        if let Some(existing) = self.category_repo.find_by_title(title).await?
            && except_id != Some(existing.id.as_str())
        {
            return Err(AppError::Conflict(format!(
                "Category \"{title}\" already exists"
            )));
        }
        Ok(())
    }

    /// Create a category.
    pub async fn create(&self, input: CategoryInput) -> AppResult<category::Model> {
        input.validate()?;
        let title = input.title.trim().to_string();
        self.ensure_title_free(&title, None).await?;

        let model = category::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(title),
            created_at: Set(Utc::now()),
        };

        let created = self.category_repo.create(model).await?;
        info!(id = %created.id, title = %created.title, "Category created");
        Ok(created)
    }

    /// Rename a category.
    pub async fn update(&self, id: &str, input: CategoryInput) -> AppResult<category::Model> {
        input.validate()?;
        let title = input.title.trim().to_string();

        let existing = self.category_repo.get_by_id(id).await?;
        self.ensure_title_free(&title, Some(id)).await?;

        let mut model: category::ActiveModel = existing.into();
        model.title = Set(title);
        self.category_repo.update(model).await
    }

    /// Delete a category. Its courses become uncategorised.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.category_repo.delete(id).await?;
        info!(id = %id, "Category deleted");
        Ok(())
    }
}
