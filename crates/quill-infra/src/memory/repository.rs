use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use quill_core::domain::{
    Author, Category, NewAuthor, NewCategory, NewPost, Page, PageRequest, Post, PostSortField,
};
use quill_core::error::RepoError;
use quill_core::ports::{AuthorRepository, BaseRepository, CategoryRepository, PostRepository};

use super::{MemoryStore, Tables};

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn email_taken(tables: &Tables, email: &str, except: Option<i64>) -> bool {
    tables
        .authors
        .values()
        .any(|a| Some(a.id) != except && a.email.eq_ignore_ascii_case(email.trim()))
}

fn name_taken(tables: &Tables, name: &str, except: Option<i64>) -> bool {
    tables
        .categories
        .values()
        .any(|c| Some(c.id) != except && c.name.to_lowercase() == name.trim().to_lowercase())
}

/// Mirrors the foreign keys on `posts.author_id` and `post_categories`.
fn check_references(tables: &Tables, author_id: i64, category_ids: &[i64]) -> Result<(), RepoError> {
    if !tables.authors.contains_key(&author_id) {
        return Err(RepoError::Constraint(format!(
            "author {author_id} does not exist"
        )));
    }
    if let Some(missing) = category_ids
        .iter()
        .find(|id| !tables.categories.contains_key(*id))
    {
        return Err(RepoError::Constraint(format!(
            "category {missing} does not exist"
        )));
    }
    Ok(())
}

fn compare_posts(a: &Post, b: &Post, field: PostSortField) -> Ordering {
    let primary = match field {
        PostSortField::Id => Ordering::Equal,
        PostSortField::Title => a.title.cmp(&b.title),
        PostSortField::Date => a.date.cmp(&b.date),
        PostSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        PostSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    };
    primary.then(a.id.cmp(&b.id))
}

/// In-memory author repository.
pub struct InMemoryAuthorRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryAuthorRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BaseRepository<Author, i64> for InMemoryAuthorRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Author>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.authors.get(&id).cloned())
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.authors.contains_key(&id))
    }

    async fn count(&self) -> Result<u64, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.authors.len() as u64)
    }

    async fn save(&self, mut author: Author) -> Result<Author, RepoError> {
        let mut tables = self.store.tables.write().await;
        let Some(existing) = tables.authors.get(&author.id) else {
            return Err(RepoError::NotFound);
        };
        let created_at = existing.created_at;
        if email_taken(&tables, &author.email, Some(author.id)) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        author.created_at = created_at;
        author.updated_at = Utc::now();
        tables.authors.insert(author.id, author.clone());
        Ok(author)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.posts.values().any(|p| p.author_id == id) {
            return Err(RepoError::Constraint("Entity is still referenced".to_string()));
        }
        tables
            .authors
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl AuthorRepository for InMemoryAuthorRepository {
    async fn create(&self, author: NewAuthor) -> Result<Author, RepoError> {
        let mut tables = self.store.tables.write().await;
        if email_taken(&tables, &author.email, None) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        let now = Utc::now();
        let created = Author {
            id: tables.next_author_id(),
            name: author.name,
            email: author.email,
            bio: author.bio,
            website: author.website,
            created_at: now,
            updated_at: now,
        };
        tables.authors.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_all(&self) -> Result<Vec<Author>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.authors.values().cloned().collect())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Author>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .authors
            .values()
            .find(|a| a.email.eq_ignore_ascii_case(email.trim()))
            .cloned())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(email_taken(&tables, email, None))
    }

    async fn search_by_name(&self, term: &str) -> Result<Vec<Author>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .authors
            .values()
            .filter(|a| contains_ignore_case(&a.name, term))
            .cloned()
            .collect())
    }

    async fn count_posts(&self, author_id: i64) -> Result<u64, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .posts
            .values()
            .filter(|p| p.author_id == author_id)
            .count() as u64)
    }
}

/// In-memory category repository.
pub struct InMemoryCategoryRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryCategoryRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BaseRepository<Category, i64> for InMemoryCategoryRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.categories.get(&id).cloned())
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.categories.contains_key(&id))
    }

    async fn count(&self) -> Result<u64, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.categories.len() as u64)
    }

    async fn save(&self, mut category: Category) -> Result<Category, RepoError> {
        let mut tables = self.store.tables.write().await;
        let Some(existing) = tables.categories.get(&category.id) else {
            return Err(RepoError::NotFound);
        };
        let created_at = existing.created_at;
        if name_taken(&tables, &category.name, Some(category.id)) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        category.created_at = created_at;
        category.updated_at = Utc::now();
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.posts.values().any(|p| p.category_ids.contains(&id)) {
            return Err(RepoError::Constraint("Entity is still referenced".to_string()));
        }
        tables
            .categories
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn create(&self, category: NewCategory) -> Result<Category, RepoError> {
        let mut tables = self.store.tables.write().await;
        if name_taken(&tables, &category.name, None) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        let now = Utc::now();
        let created = Category {
            id: tables.next_category_id(),
            name: category.name,
            description: category.description,
            created_at: now,
            updated_at: now,
        };
        tables.categories.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_all(&self) -> Result<Vec<Category>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.categories.values().cloned().collect())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.store.tables.read().await;
        let name = name.trim().to_lowercase();
        Ok(tables
            .categories
            .values()
            .find(|c| c.name.to_lowercase() == name)
            .cloned())
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(name_taken(&tables, name, None))
    }

    async fn search_by_name(&self, term: &str) -> Result<Vec<Category>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .categories
            .values()
            .filter(|c| contains_ignore_case(&c.name, term))
            .cloned()
            .collect())
    }
}

/// In-memory post repository.
pub struct InMemoryPostRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryPostRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    async fn filtered(&self, keep: impl Fn(&Post) -> bool) -> Vec<Post> {
        let tables = self.store.tables.read().await;
        tables.posts.values().filter(|p| keep(p)).cloned().collect()
    }
}

#[async_trait]
impl BaseRepository<Post, i64> for InMemoryPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.posts.get(&id).cloned())
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.posts.contains_key(&id))
    }

    async fn count(&self) -> Result<u64, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.posts.len() as u64)
    }

    async fn save(&self, mut post: Post) -> Result<Post, RepoError> {
        let mut tables = self.store.tables.write().await;
        let Some(existing) = tables.posts.get(&post.id) else {
            return Err(RepoError::NotFound);
        };
        let created_at = existing.created_at;
        let category_ids: Vec<i64> = post.category_ids.iter().copied().collect();
        check_references(&tables, post.author_id, &category_ids)?;

        post.created_at = created_at;
        post.updated_at = Utc::now();
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        tables
            .posts
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, RepoError> {
        let mut tables = self.store.tables.write().await;
        let category_ids: Vec<i64> = post.category_ids.iter().copied().collect();
        check_references(&tables, post.author_id, &category_ids)?;

        let now = Utc::now();
        let created = Post {
            id: tables.next_post_id(),
            title: post.title,
            content: post.content,
            date: post.date,
            author_id: post.author_id,
            category_ids: post.category_ids,
            created_at: now,
            updated_at: now,
        };
        tables.posts.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.filtered(|_| true).await)
    }

    async fn search_by_title(&self, keyword: &str) -> Result<Vec<Post>, RepoError> {
        Ok(self
            .filtered(|p| contains_ignore_case(&p.title, keyword))
            .await)
    }

    async fn find_by_author_id(&self, author_id: i64) -> Result<Vec<Post>, RepoError> {
        Ok(self.filtered(|p| p.author_id == author_id).await)
    }

    async fn find_by_category_id(&self, category_id: i64) -> Result<Vec<Post>, RepoError> {
        Ok(self
            .filtered(|p| p.category_ids.contains(&category_id))
            .await)
    }

    async fn count_by_category(&self, category_id: i64) -> Result<u64, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .posts
            .values()
            .filter(|p| p.category_ids.contains(&category_id))
            .count() as u64)
    }

    async fn find_page(&self, request: &PageRequest) -> Result<Page<Post>, RepoError> {
        let mut posts = self.filtered(|_| true).await;
        posts.sort_by(|a, b| compare_posts(a, b, request.sort));

        let total = posts.len() as u64;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let size = usize::try_from(request.size).unwrap_or(usize::MAX);
        let content = posts.into_iter().skip(offset).take(size).collect();

        Ok(Page::new(content, request, total))
    }
}
