//! # Quill Shared
//!
//! Wire types shared by the API server and its clients.
//! Nothing in here knows about storage or business rules.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, PageResponse};
