//! # Quill Infrastructure
//!
//! Concrete implementations of the store ports defined in `quill-core`.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL store via SeaORM
//! - `minimal` - no external dependencies, in-memory store only

pub mod database;
pub mod memory;

pub use database::DatabaseConnections;
pub use memory::{
    InMemoryAuthorRepository, InMemoryCategoryRepository, InMemoryPostRepository, MemoryStore,
};

#[cfg(feature = "postgres")]
pub use database::{PostgresAuthorRepository, PostgresCategoryRepository, PostgresPostRepository};
