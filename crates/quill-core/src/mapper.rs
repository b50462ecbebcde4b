//! Conversion between domain entities and the wire types in `quill-shared`.
//!
//! Outbound mapping is plain `From` conversion and never nests records: a
//! post carries its author and categories as ids. Inbound mapping from a
//! summary goes through [`PostMapper`], which re-resolves every id against
//! the stores instead of trusting the payload.

use std::collections::BTreeSet;
use std::sync::Arc;

use quill_shared::PageResponse;
use quill_shared::dto::{
    AuthorResponse, AuthorWithPostCountResponse, CategoryResponse, CreateAuthorRequest,
    CreateCategoryRequest, CreatePostRequest, PostResponse, PostSummary, UpdateAuthorRequest,
    UpdateCategoryRequest, UpdatePostRequest,
};

use crate::domain::{
    Author, AuthorChanges, AuthorWithPostCount, Category, CategoryChanges, NewAuthor,
    NewCategory, Page, Post, PostChanges, PostDraft,
};
use crate::error::{DomainError, DomainResult};
use crate::ports::{AuthorRepository, CategoryRepository, PostRepository};
use crate::service::CATEGORIES_REQUIRED;

impl From<Author> for AuthorResponse {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            name: author.name,
            email: author.email,
            bio: author.bio,
            website: author.website,
            created_at: author.created_at,
            updated_at: author.updated_at,
        }
    }
}

impl From<AuthorWithPostCount> for AuthorWithPostCountResponse {
    fn from(entry: AuthorWithPostCount) -> Self {
        let AuthorWithPostCount { author, post_count } = entry;
        Self {
            id: author.id,
            name: author.name,
            email: author.email,
            bio: author.bio,
            website: author.website,
            post_count,
        }
    }
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
        }
    }
}

impl From<&Post> for PostSummary {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            author_id: post.author_id,
            category_ids: post.category_ids.iter().copied().collect(),
        }
    }
}

impl From<Post> for PostSummary {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            author_id: post.author_id,
            category_ids: post.category_ids.into_iter().collect(),
        }
    }
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            date: post.date,
            author_id: post.author_id,
            category_ids: post.category_ids.into_iter().collect(),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// Maps a page of posts to the summary envelope.
pub fn post_page_response(page: Page<Post>) -> PageResponse<PostSummary> {
    let total_pages = page.total_pages();
    let first = page.is_first();
    let last = page.is_last();
    let page = page.map(PostSummary::from);
    PageResponse {
        number_of_elements: page.content.len(),
        content: page.content,
        page_number: page.page_number,
        page_size: page.page_size,
        total_elements: page.total_elements,
        total_pages,
        first,
        last,
    }
}

impl From<CreateAuthorRequest> for NewAuthor {
    fn from(req: CreateAuthorRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            bio: req.bio,
            website: req.website,
        }
    }
}

impl From<UpdateAuthorRequest> for AuthorChanges {
    fn from(req: UpdateAuthorRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            bio: req.bio,
            website: req.website,
        }
    }
}

impl From<CreateCategoryRequest> for NewCategory {
    fn from(req: CreateCategoryRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
        }
    }
}

impl From<UpdateCategoryRequest> for CategoryChanges {
    fn from(req: UpdateCategoryRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
        }
    }
}

impl From<CreatePostRequest> for PostDraft {
    fn from(req: CreatePostRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
            date: req.date,
            author_id: req.author_id,
            category_ids: req.category_ids,
        }
    }
}

impl From<UpdatePostRequest> for PostChanges {
    fn from(req: UpdatePostRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
            date: req.date,
            author_id: req.author_id,
            category_ids: req.category_ids,
        }
    }
}

/// Rebuilds posts from summaries, verifying each reference on the way in.
pub struct PostMapper {
    posts: Arc<dyn PostRepository>,
    authors: Arc<dyn AuthorRepository>,
    categories: Arc<dyn CategoryRepository>,
}

impl PostMapper {
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

    /// Returns the stored post overlaid with the summary's title and
    /// references. Fails with `NotFound` if the post, the author or any
    /// category does not exist, and with `Validation` if the summary lists
    /// no categories.
    pub async fn summary_to_post(&self, summary: &PostSummary) -> DomainResult<Post> {
        let mut post = self
            .posts
            .find_by_id(summary.id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", summary.id))?;

        if summary.category_ids.is_empty() {
            return Err(DomainError::invalid_field("categoryIds", CATEGORIES_REQUIRED));
        }

        if !self.authors.exists_by_id(summary.author_id).await? {
            return Err(DomainError::not_found("Author", summary.author_id));
        }

        let mut category_ids = BTreeSet::new();
        for &id in &summary.category_ids {
            if !self.categories.exists_by_id(id).await? {
                return Err(DomainError::not_found("Category", id));
            }
            category_ids.insert(id);
        }

        post.title = summary.title.clone();
        post.author_id = summary.author_id;
        post.category_ids = category_ids;
        Ok(post)
    }
}
