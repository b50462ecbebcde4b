//! In-memory store - used for tests and when no database is configured.
//!
//! The three repositories share one [`MemoryStore`], so references between
//! authors, categories and posts are checked the way the relational schema
//! checks them: unique emails and names, restricted deletes, and foreign
//! keys on every post write. Data is lost on process restart.

mod repository;

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use quill_core::domain::{Author, Category, Post};

pub use repository::{InMemoryAuthorRepository, InMemoryCategoryRepository, InMemoryPostRepository};

#[derive(Default)]
pub(crate) struct Tables {
    pub(crate) authors: BTreeMap<i64, Author>,
    pub(crate) categories: BTreeMap<i64, Category>,
    pub(crate) posts: BTreeMap<i64, Post>,
    last_author_id: i64,
    last_category_id: i64,
    last_post_id: i64,
}

impl Tables {
    pub(crate) fn next_author_id(&mut self) -> i64 {
        self.last_author_id += 1;
        self.last_author_id
    }

    pub(crate) fn next_category_id(&mut self) -> i64 {
        self.last_category_id += 1;
        self.last_category_id
    }

    pub(crate) fn next_post_id(&mut self) -> i64 {
        self.last_post_id += 1;
        self.last_post_id
    }
}

/// Shared backing tables for the in-memory repositories.
#[derive(Default)]
pub struct MemoryStore {
    pub(crate) tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn authors(self: &Arc<Self>) -> InMemoryAuthorRepository {
        InMemoryAuthorRepository::new(Arc::clone(self))
    }

    pub fn categories(self: &Arc<Self>) -> InMemoryCategoryRepository {
        InMemoryCategoryRepository::new(Arc::clone(self))
    }

    pub fn posts(self: &Arc<Self>) -> InMemoryPostRepository {
        InMemoryPostRepository::new(Arc::clone(self))
    }
}
