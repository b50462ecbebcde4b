#![allow(dead_code)]

use std::sync::Arc;

use quill_core::domain::{Author, Category, NewAuthor, NewCategory, Post, PostDraft};
use quill_core::mapper::PostMapper;
use quill_core::{AuthorService, CategoryService, PostService};
use quill_infra::MemoryStore;

/// Services wired over one shared in-memory store.
pub struct Services {
    pub authors: AuthorService,
    pub categories: CategoryService,
    pub posts: PostService,
    pub mapper: PostMapper,
}

pub fn services() -> Services {
    let store = MemoryStore::new();
    let authors = Arc::new(store.authors());
    let categories = Arc::new(store.categories());
    let posts = Arc::new(store.posts());

    Services {
        authors: AuthorService::new(authors.clone()),
        categories: CategoryService::new(categories.clone(), posts.clone()),
        posts: PostService::new(posts.clone(), authors.clone(), categories.clone()),
        mapper: PostMapper::new(posts, authors, categories),
    }
}

impl Services {
    pub async fn author(&self, name: &str, email: &str) -> Author {
        self.authors
            .create_author(NewAuthor {
                name: name.to_string(),
                email: email.to_string(),
                ..Default::default()
            })
            .await
            .expect("author should be created")
    }

    pub async fn category(&self, name: &str) -> Category {
        self.categories
            .create_category(NewCategory {
                name: name.to_string(),
                description: None,
            })
            .await
            .expect("category should be created")
    }

    pub async fn post(&self, title: &str, author_id: i64, category_ids: &[i64]) -> Post {
        self.posts
            .create_post(PostDraft {
                title: title.to_string(),
                author_id: Some(author_id),
                category_ids: category_ids.to_vec(),
                ..Default::default()
            })
            .await
            .expect("post should be created")
    }
}

pub fn ids(post: &Post) -> Vec<i64> {
    post.category_ids.iter().copied().collect()
}
