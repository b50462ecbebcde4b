use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Post entity - a blog post referencing one author and a set of categories.
///
/// Both references are stored as ids. `category_ids` is a set, so it can
/// never hold the same category twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: Option<String>,
    pub date: NaiveDate,
    pub author_id: i64,
    pub category_ids: BTreeSet<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Unvalidated create input, as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub content: Option<String>,
    pub date: Option<NaiveDate>,
    pub author_id: Option<i64>,
    pub category_ids: Vec<i64>,
}

/// A validated post ready to be inserted; all references have been resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: Option<String>,
    pub date: NaiveDate,
    pub author_id: i64,
    pub category_ids: BTreeSet<i64>,
}

/// Partial post update; `None` means "keep the current value".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub date: Option<NaiveDate>,
    pub author_id: Option<i64>,
    /// Replaces the whole set when present.
    pub category_ids: Option<Vec<i64>>,
}
