//! # Quill Core
//!
//! The domain layer of the Quill blog backend: entities, the error
//! taxonomy, store ports and the services that keep post references
//! consistent. Storage and HTTP live in other crates.

pub mod domain;
pub mod error;
pub mod mapper;
pub mod ports;
pub mod service;
pub mod validation;

pub use error::{DomainError, DomainResult, RepoError};
pub use service::{AuthorService, CategoryService, PostService};
