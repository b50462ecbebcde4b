use std::sync::Arc;

use crate::domain::{Category, CategoryChanges, NewCategory};
use crate::error::{DomainError, DomainResult, or_not_found};
use crate::ports::{CategoryRepository, PostRepository};
use crate::validation::{DESCRIPTION_MAX_CHARS, FieldErrors, trimmed};

const INVALID_CATEGORY: &str = "Category has invalid fields";

pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
    posts: Arc<dyn PostRepository>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { categories, posts }
    }

    pub async fn list_categories(&self) -> DomainResult<Vec<Category>> {
        Ok(self.categories.find_all().await?)
    }

    pub async fn get_category(&self, id: i64) -> DomainResult<Category> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Category", id))
    }

    pub async fn create_category(&self, input: NewCategory) -> DomainResult<Category> {
        let category = NewCategory {
            name: input.name.trim().to_string(),
            description: trimmed(input.description),
        };

        let mut errors = FieldErrors::new();
        errors.require_text("name", &category.name, "Category name is required");
        if let Some(description) = &category.description {
            errors.max_chars("description", description, DESCRIPTION_MAX_CHARS);
        }
        errors.finish(INVALID_CATEGORY)?;

        if self.categories.exists_by_name(&category.name).await? {
            return Err(DomainError::Conflict(format!(
                "Category with name {} already exists",
                category.name
            )));
        }

        let created = self.categories.create(category).await?;
        tracing::info!(category_id = created.id, name = %created.name, "Category created");
        Ok(created)
    }

    pub async fn update_category(&self, id: i64, changes: CategoryChanges) -> DomainResult<Category> {
        let mut category = self.get_category(id).await?;

        let changes = CategoryChanges {
            name: changes.name.map(|n| n.trim().to_string()),
            description: changes.description.map(|d| d.trim().to_string()),
        };

        let mut errors = FieldErrors::new();
        if let Some(name) = &changes.name {
            errors.require_text("name", name, "Category name must not be blank");
        }
        if let Some(description) = &changes.description {
            errors.max_chars("description", description, DESCRIPTION_MAX_CHARS);
        }
        errors.finish(INVALID_CATEGORY)?;

        if let Some(name) = &changes.name {
            if let Some(other) = self.categories.find_by_name(name).await? {
                if other.id != id {
                    return Err(DomainError::Conflict(format!(
                        "Category name {name} is already taken"
                    )));
                }
            }
        }

        category.apply(changes);
        let saved = self
            .categories
            .save(category)
            .await
            .map_err(or_not_found("Category", id))?;
        tracing::info!(category_id = id, "Category updated");
        Ok(saved)
    }

    /// Deletion is refused while any post is still filed under the category.
    pub async fn delete_category(&self, id: i64) -> DomainResult<()> {
        if !self.categories.exists_by_id(id).await? {
            return Err(DomainError::not_found("Category", id));
        }

        let posts = self.posts.count_by_category(id).await?;
        if posts > 0 {
            return Err(DomainError::Conflict(format!(
                "Category with id {id} is still used by {posts} post(s)"
            )));
        }

        self.categories
            .delete(id)
            .await
            .map_err(or_not_found("Category", id))?;
        tracing::info!(category_id = id, "Category deleted");
        Ok(())
    }

    pub async fn search_by_name(&self, term: &str) -> DomainResult<Vec<Category>> {
        let term = term.trim();
        if term.is_empty() {
            return self.list_categories().await;
        }
        Ok(self.categories.search_by_name(term).await?)
    }

    pub async fn exists_by_name(&self, name: &str) -> DomainResult<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(false);
        }
        Ok(self.categories.exists_by_name(name).await?)
    }
}
