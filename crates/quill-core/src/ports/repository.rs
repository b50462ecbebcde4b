use async_trait::async_trait;

use crate::domain::{Author, Category, NewAuthor, NewCategory, NewPost, Page, PageRequest, Post};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    async fn exists_by_id(&self, id: ID) -> Result<bool, RepoError>;

    async fn count(&self) -> Result<u64, RepoError>;

    /// Persist changes to an existing entity. Fails with `NotFound` if it
    /// no longer exists.
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Author repository with domain-specific methods.
///
/// Email and name lookups are case-insensitive.
#[async_trait]
pub trait AuthorRepository: BaseRepository<Author, i64> {
    async fn create(&self, author: NewAuthor) -> Result<Author, RepoError>;

    /// All authors, id ascending.
    async fn find_all(&self) -> Result<Vec<Author>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Author>, RepoError>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepoError>;

    /// Authors whose name contains `term`, id ascending.
    async fn search_by_name(&self, term: &str) -> Result<Vec<Author>, RepoError>;

    /// Number of posts attributed to `author_id`.
    async fn count_posts(&self, author_id: i64) -> Result<u64, RepoError>;
}

#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, i64> {
    async fn create(&self, category: NewCategory) -> Result<Category, RepoError>;

    async fn find_all(&self) -> Result<Vec<Category>, RepoError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, RepoError>;

    async fn exists_by_name(&self, name: &str) -> Result<bool, RepoError>;

    async fn search_by_name(&self, term: &str) -> Result<Vec<Category>, RepoError>;
}

/// Post repository. Every listing is ordered by id ascending unless it
/// takes a `PageRequest`.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i64> {
    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    async fn find_all(&self) -> Result<Vec<Post>, RepoError>;

    /// Case-insensitive substring match on the title.
    async fn search_by_title(&self, keyword: &str) -> Result<Vec<Post>, RepoError>;

    async fn find_by_author_id(&self, author_id: i64) -> Result<Vec<Post>, RepoError>;

    async fn find_by_category_id(&self, category_id: i64) -> Result<Vec<Post>, RepoError>;

    async fn count_by_category(&self, category_id: i64) -> Result<u64, RepoError>;

    async fn find_page(&self, request: &PageRequest) -> Result<Page<Post>, RepoError>;
}
