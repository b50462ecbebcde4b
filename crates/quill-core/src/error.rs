//! Domain-level error types.

use std::collections::BTreeMap;

use thiserror::Error;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity_type} not found with id {id}")]
    NotFound { entity_type: &'static str, id: i64 },

    /// Malformed or missing input. `field_errors` maps field name to message.
    #[error("{message}")]
    Validation {
        message: String,
        field_errors: BTreeMap<String, String>,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity_type: &'static str, id: i64) -> Self {
        Self::NotFound { entity_type, id }
    }

    /// Validation failure that is not tied to a single field.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field_errors: BTreeMap::new(),
        }
    }

    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut field_errors = BTreeMap::new();
        field_errors.insert(field.to_string(), message.clone());
        Self::Validation {
            message,
            field_errors,
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

/// Store failures carry no entity context, so a bare `NotFound` surfacing
/// here means a row vanished mid-operation.
impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Constraint(msg) => DomainError::Conflict(msg),
            RepoError::NotFound => DomainError::Internal("record disappeared during write".into()),
            RepoError::Connection(msg) | RepoError::Query(msg) => DomainError::Internal(msg),
        }
    }
}

/// Maps a store `NotFound` onto the entity the caller was addressing.
pub(crate) fn or_not_found(entity_type: &'static str, id: i64) -> impl FnOnce(RepoError) -> DomainError {
    move |err| match err {
        RepoError::NotFound => DomainError::not_found(entity_type, id),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_maps_to_conflict() {
        let err: DomainError = RepoError::Constraint("duplicate email".into()).into();
        assert!(matches!(err, DomainError::Conflict(msg) if msg == "duplicate email"));
    }

    #[test]
    fn test_not_found_gets_entity_context() {
        let err = or_not_found("Post", 7)(RepoError::NotFound);
        assert_eq!(err.to_string(), "Post not found with id 7");
    }

    #[test]
    fn test_invalid_field_records_field() {
        let err = DomainError::invalid_field("title", "Title is required");
        match err {
            DomainError::Validation { field_errors, .. } => {
                assert_eq!(field_errors.get("title").map(String::as_str), Some("Title is required"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
