//! Middleware modules.

pub mod error;
pub mod error_path;
