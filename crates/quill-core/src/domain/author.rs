use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author entity - the writer a post is attributed to.
///
/// Posts are found through `PostRepository::find_by_author_id`; the author
/// holds no back-pointer to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
    /// Stored trimmed and lower-cased.
    pub email: String,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for a new author. Ids and timestamps are assigned by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAuthor {
    pub name: String,
    pub email: String,
    pub bio: Option<String>,
    pub website: Option<String>,
}

/// Partial author update; `None` leaves the current value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
}

impl AuthorChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.bio.is_none() && self.website.is_none()
    }
}

impl Author {
    /// Merge the supplied fields into this author.
    pub fn apply(&mut self, changes: AuthorChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
        // An explicitly supplied empty string clears the optional fields.
        if let Some(bio) = changes.bio {
            self.bio = Some(bio).filter(|b| !b.is_empty());
        }
        if let Some(website) = changes.website {
            self.website = Some(website).filter(|w| !w.is_empty());
        }
    }
}

/// An author together with the number of posts attributed to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorWithPostCount {
    pub author: Author,
    pub post_count: u64,
}
