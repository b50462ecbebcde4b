//! Standardized API response types.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Error body returned for every failed request.
///
/// `fieldErrors` is only present for validation failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// UTC time of the failure, `yyyy-MM-ddTHH:mm:ss`.
    pub timestamp: String,

    /// The HTTP status code.
    pub status: u16,

    /// A short, human-readable summary of the problem type.
    pub error: String,

    /// A human-readable explanation specific to this occurrence.
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<BTreeMap<String, String>>,

    /// Request path that produced the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: u16, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
            status,
            error: error.into(),
            message: message.into(),
            field_errors: None,
            path: None,
        }
    }

    pub fn with_field_errors(mut self, field_errors: BTreeMap<String, String>) -> Self {
        if !field_errors.is_empty() {
            self.field_errors = Some(field_errors);
        }
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    // Common error constructors
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(400, "Bad Request", message)
    }

    pub fn validation(message: impl Into<String>, field_errors: BTreeMap<String, String>) -> Self {
        Self::new(400, "Validation Failed", message).with_field_errors(field_errors)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(404, "Resource Not Found", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(409, "Conflict", message)
    }

    pub fn internal_error() -> Self {
        Self::new(
            500,
            "Internal Server Error",
            "An unexpected error occurred",
        )
    }
}

/// Page envelope for paginated listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub page_number: u64,
    pub page_size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
    pub number_of_elements: usize,
    pub first: bool,
    pub last: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorCountResponse {
    pub total_authors: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostCountResponse {
    pub total_posts: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExistsResponse {
    pub exists: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_omitted_when_empty() {
        let body = ErrorResponse::validation("Invalid input", BTreeMap::new());
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("fieldErrors").is_none());
        assert_eq!(json["status"], 400);
    }

    #[test]
    fn test_field_errors_rendered_camel_case() {
        let mut fields = BTreeMap::new();
        fields.insert("title".to_string(), "Title is required".to_string());
        let body = ErrorResponse::validation("Invalid input", fields).with_path("/api/posts");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["fieldErrors"]["title"], "Title is required");
        assert_eq!(json["path"], "/api/posts");
        assert_eq!(json["error"], "Validation Failed");
    }
}
