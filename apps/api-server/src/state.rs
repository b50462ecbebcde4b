//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{AuthorRepository, CategoryRepository, PostRepository};
use quill_core::{AuthorService, CategoryService, PostService};
use quill_infra::MemoryStore;
use quill_infra::database::{DatabaseConfig, DatabaseConnections};

#[cfg(feature = "postgres")]
use quill_infra::database::{
    PostgresAuthorRepository, PostgresCategoryRepository, PostgresPostRepository,
};

/// The three stores every service is built from.
struct Stores {
    authors: Arc<dyn AuthorRepository>,
    categories: Arc<dyn CategoryRepository>,
    posts: Arc<dyn PostRepository>,
}

impl Stores {
    fn in_memory() -> Self {
        let store = MemoryStore::new();
        Self {
            authors: Arc::new(store.authors()),
            categories: Arc::new(store.categories()),
            posts: Arc::new(store.posts()),
        }
    }

    #[cfg(feature = "postgres")]
    fn postgres(db: &DatabaseConnections) -> Self {
        Self {
            authors: Arc::new(PostgresAuthorRepository::new(db.main.clone())),
            categories: Arc::new(PostgresCategoryRepository::new(db.main.clone())),
            posts: Arc::new(PostgresPostRepository::new(db.main.clone())),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub authors: Arc<AuthorService>,
    pub categories: Arc<CategoryService>,
    pub posts: Arc<PostService>,
    pub db: Option<Arc<DatabaseConnections>>,
    pub default_page_size: u64,
}

impl AppState {
    /// Build the application state, preferring PostgreSQL when configured
    /// and reachable.
    pub async fn new(db_config: Option<&DatabaseConfig>, default_page_size: u64) -> Self {
        #[cfg(feature = "postgres")]
        let (db, stores) = match db_config {
            Some(config) => match DatabaseConnections::init(config).await {
                Ok(connections) => {
                    let stores = Stores::postgres(&connections);
                    (Some(Arc::new(connections)), stores)
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    (None, Stores::in_memory())
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running with the in-memory store.");
                (None, Stores::in_memory())
            }
        };

        #[cfg(not(feature = "postgres"))]
        let (db, stores) = {
            if db_config.is_some() {
                tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
            }
            (None, Stores::in_memory())
        };

        let state = Self::from_stores(stores, db, default_page_size);
        tracing::info!(store = state.store_backend(), "Application state initialized");
        state
    }

    /// State backed by a fresh in-memory store.
    #[cfg(test)]
    pub fn in_memory(default_page_size: u64) -> Self {
        Self::from_stores(Stores::in_memory(), None, default_page_size)
    }

    fn from_stores(
        stores: Stores,
        db: Option<Arc<DatabaseConnections>>,
        default_page_size: u64,
    ) -> Self {
        let Stores {
            authors,
            categories,
            posts,
        } = stores;

        Self {
            authors: Arc::new(AuthorService::new(authors.clone())),
            categories: Arc::new(CategoryService::new(categories.clone(), posts.clone())),
            posts: Arc::new(PostService::new(posts, authors, categories)),
            db,
            default_page_size,
        }
    }

    pub fn store_backend(&self) -> &'static str {
        if self.db.is_some() { "postgres" } else { "memory" }
    }
}
