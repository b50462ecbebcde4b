//! Post use cases and the reference rules that go with them.
//!
//! Every write resolves the author and category ids it is given before
//! anything is persisted, so a failed call never leaves a partial post
//! behind. A post always ends a successful write with exactly one live
//! author and at least one live category.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;

use crate::domain::{NewPost, Page, PageRequest, Post, PostChanges, PostDraft, PostSortField};
use crate::error::{DomainError, DomainResult, or_not_found};
use crate::ports::{AuthorRepository, CategoryRepository, PostRepository};
use crate::validation::FieldErrors;

const INVALID_POST: &str = "Post has invalid fields";
const TITLE_REQUIRED: &str = "Title is required";
const AUTHOR_REQUIRED: &str = "Author ID is required";
pub(crate) const CATEGORIES_REQUIRED: &str = "At least one category is required";
pub const LAST_CATEGORY: &str = "post must retain at least one category";

pub struct PostService {
    posts: Arc<dyn PostRepository>,
    authors: Arc<dyn AuthorRepository>,
    categories: Arc<dyn CategoryRepository>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        authors: Arc<dyn AuthorRepository>,
        categories: Arc<dyn CategoryRepository>,
    ) -> Self {
        Self {
            posts,
            authors,
            categories,
        }
    }

    pub async fn list_posts(&self) -> DomainResult<Vec<Post>> {
        Ok(self.posts.find_all().await?)
    }

    pub async fn get_post(&self, id: i64) -> DomainResult<Post> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))
    }

    pub async fn count(&self) -> DomainResult<u64> {
        Ok(self.posts.count().await?)
    }

    /// Creates a post after checking the draft and resolving its references.
    ///
    /// Missing categories are reported by the first unknown id in the order
    /// the caller supplied them. Duplicate category ids collapse into one.
    pub async fn create_post(&self, draft: PostDraft) -> DomainResult<Post> {
        let mut errors = FieldErrors::new();
        errors.require_text("title", &draft.title, TITLE_REQUIRED);
        if draft.author_id.is_none() {
            errors.add("authorId", AUTHOR_REQUIRED);
        }
        if draft.category_ids.is_empty() {
            errors.add("categoryIds", CATEGORIES_REQUIRED);
        }
        errors.finish(INVALID_POST)?;

        let author_id = draft
            .author_id
            .ok_or_else(|| DomainError::invalid_field("authorId", AUTHOR_REQUIRED))?;
        self.ensure_author(author_id).await?;
        let category_ids = self.resolve_categories(&draft.category_ids).await?;

        let post = NewPost {
            title: draft.title,
            content: draft.content,
            date: draft.date.unwrap_or_else(|| Utc::now().date_naive()),
            author_id,
            category_ids,
        };

        let created = self.posts.create(post).await?;
        tracing::info!(
            post_id = created.id,
            author_id = created.author_id,
            categories = ?created.category_ids,
            "Post created"
        );
        Ok(created)
    }

    /// Merges the supplied fields into the post. Omitted fields keep their
    /// current value; a supplied category list replaces the whole set.
    pub async fn update_post(&self, id: i64, changes: PostChanges) -> DomainResult<Post> {
        let mut post = self.get_post(id).await?;

        let mut errors = FieldErrors::new();
        if let Some(title) = &changes.title {
            errors.require_text("title", title, TITLE_REQUIRED);
        }
        if changes.category_ids.as_ref().is_some_and(Vec::is_empty) {
            errors.add("categoryIds", CATEGORIES_REQUIRED);
        }
        errors.finish(INVALID_POST)?;

        if let Some(author_id) = changes.author_id {
            self.ensure_author(author_id).await?;
            post.author_id = author_id;
        }
        if let Some(ids) = &changes.category_ids {
            post.category_ids = self.resolve_categories(ids).await?;
        }
        if let Some(title) = changes.title {
            post.title = title;
        }
        if let Some(content) = changes.content {
            post.content = Some(content);
        }
        if let Some(date) = changes.date {
            post.date = date;
        }

        let saved = self.posts.save(post).await.map_err(or_not_found("Post", id))?;
        tracing::info!(post_id = id, "Post updated");
        Ok(saved)
    }

    /// Points the post at `author_id`. Re-assigning the current author is a
    /// no-op.
    pub async fn assign_author(&self, post_id: i64, author_id: i64) -> DomainResult<Post> {
        let mut post = self.get_post(post_id).await?;
        self.ensure_author(author_id).await?;

        if post.author_id == author_id {
            return Ok(post);
        }

        post.author_id = author_id;
        let saved = self
            .posts
            .save(post)
            .await
            .map_err(or_not_found("Post", post_id))?;
        tracing::info!(post_id, author_id, "Author assigned to post");
        Ok(saved)
    }

    /// Adds `category_id` to the post's set unless it is already there.
    pub async fn assign_category(&self, post_id: i64, category_id: i64) -> DomainResult<Post> {
        let mut post = self.get_post(post_id).await?;
        self.ensure_category(category_id).await?;

        if !post.category_ids.insert(category_id) {
            tracing::debug!(post_id, category_id, "Category already assigned");
            return Ok(post);
        }

        let saved = self
            .posts
            .save(post)
            .await
            .map_err(or_not_found("Post", post_id))?;
        tracing::info!(post_id, category_id, "Category assigned to post");
        Ok(saved)
    }

    /// Removes `category_id` from the post. Absent ids are a no-op; removing
    /// the last category is rejected.
    pub async fn remove_category(&self, post_id: i64, category_id: i64) -> DomainResult<Post> {
        let mut post = self.get_post(post_id).await?;

        if !post.category_ids.contains(&category_id) {
            return Ok(post);
        }
        if post.category_ids.len() == 1 {
            return Err(DomainError::invalid_field("categoryIds", LAST_CATEGORY));
        }

        post.category_ids.remove(&category_id);
        let saved = self
            .posts
            .save(post)
            .await
            .map_err(or_not_found("Post", post_id))?;
        tracing::info!(post_id, category_id, "Category removed from post");
        Ok(saved)
    }

    pub async fn delete_post(&self, id: i64) -> DomainResult<()> {
        if !self.posts.exists_by_id(id).await? {
            return Err(DomainError::not_found("Post", id));
        }
        self.posts.delete(id).await.map_err(or_not_found("Post", id))?;
        tracing::info!(post_id = id, "Post deleted");
        Ok(())
    }

    /// Case-insensitive title search. A blank keyword returns every post.
    pub async fn search_by_title(&self, keyword: &str) -> DomainResult<Vec<Post>> {
        if keyword.trim().is_empty() {
            return self.list_posts().await;
        }
        tracing::debug!(keyword, "Searching posts by title");
        Ok(self.posts.search_by_title(keyword).await?)
    }

    pub async fn list_paged(&self, page: u64, size: u64, sort_field: &str) -> DomainResult<Page<Post>> {
        let sort: PostSortField = sort_field.parse()?;
        let request = PageRequest::new(page, size, sort)?;
        Ok(self.posts.find_page(&request).await?)
    }

    pub async fn list_by_author(&self, author_id: i64) -> DomainResult<Vec<Post>> {
        self.ensure_author(author_id).await?;
        Ok(self.posts.find_by_author_id(author_id).await?)
    }

    pub async fn list_by_category(&self, category_id: i64) -> DomainResult<Vec<Post>> {
        self.ensure_category(category_id).await?;
        Ok(self.posts.find_by_category_id(category_id).await?)
    }

    async fn ensure_author(&self, author_id: i64) -> DomainResult<()> {
        if self.authors.exists_by_id(author_id).await? {
            Ok(())
        } else {
            Err(DomainError::not_found("Author", author_id))
        }
    }

    async fn ensure_category(&self, category_id: i64) -> DomainResult<()> {
        if self.categories.exists_by_id(category_id).await? {
            Ok(())
        } else {
            Err(DomainError::not_found("Category", category_id))
        }
    }

    /// Checks every id in caller order and returns them as a set.
    async fn resolve_categories(&self, ids: &[i64]) -> DomainResult<BTreeSet<i64>> {
        let mut resolved = BTreeSet::new();
        for &id in ids {
            if resolved.contains(&id) {
                continue;
            }
            self.ensure_category(id).await?;
            resolved.insert(id);
        }
        Ok(resolved)
    }
}
