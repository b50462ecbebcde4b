use std::sync::Arc;

use crate::domain::{Author, AuthorChanges, AuthorWithPostCount, NewAuthor};
use crate::error::{DomainError, DomainResult, or_not_found};
use crate::ports::AuthorRepository;
use crate::validation::{BIO_MAX_CHARS, FieldErrors, trimmed};

use super::mask_email;

const INVALID_AUTHOR: &str = "Author has invalid fields";

/// Author use cases: CRUD, email uniqueness and post-count reporting.
pub struct AuthorService {
    authors: Arc<dyn AuthorRepository>,
}

impl AuthorService {
    pub fn new(authors: Arc<dyn AuthorRepository>) -> Self {
        Self { authors }
    }

    pub async fn list_authors(&self) -> DomainResult<Vec<Author>> {
        Ok(self.authors.find_all().await?)
    }

    pub async fn get_author(&self, id: i64) -> DomainResult<Author> {
        self.authors
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Author", id))
    }

    pub async fn create_author(&self, input: NewAuthor) -> DomainResult<Author> {
        let author = NewAuthor {
            name: input.name.trim().to_string(),
            email: input.email.trim().to_lowercase(),
            bio: trimmed(input.bio),
            website: trimmed(input.website),
        };

        let mut errors = FieldErrors::new();
        errors.require_text("name", &author.name, "Author name is required");
        errors.email("email", &author.email);
        check_optional_fields(&mut errors, author.bio.as_deref(), author.website.as_deref());
        errors.finish(INVALID_AUTHOR)?;

        if self.authors.exists_by_email(&author.email).await? {
            return Err(DomainError::Conflict(format!(
                "Author with email {} already exists",
                author.email
            )));
        }

        let created = self.authors.create(author).await?;
        tracing::info!(
            author_id = created.id,
            email = %mask_email(&created.email),
            "Author created"
        );
        Ok(created)
    }

    /// Applies only the supplied fields. A supplied name or email must not be
    /// blank.
    pub async fn update_author(&self, id: i64, changes: AuthorChanges) -> DomainResult<Author> {
        let mut author = self.get_author(id).await?;

        let changes = AuthorChanges {
            name: changes.name.map(|n| n.trim().to_string()),
            email: changes.email.map(|e| e.trim().to_lowercase()),
            bio: changes.bio.map(|b| b.trim().to_string()),
            website: changes.website.map(|w| w.trim().to_string()),
        };

        let mut errors = FieldErrors::new();
        if let Some(name) = &changes.name {
            errors.require_text("name", name, "Author name must not be blank");
        }
        if let Some(email) = &changes.email {
            errors.email("email", email);
        }
        check_optional_fields(&mut errors, changes.bio.as_deref(), changes.website.as_deref());
        errors.finish(INVALID_AUTHOR)?;

        if let Some(email) = changes.email.as_deref().filter(|e| *e != author.email) {
            if let Some(other) = self.authors.find_by_email(email).await? {
                if other.id != id {
                    return Err(DomainError::Conflict(format!(
                        "Email {email} is already taken by another author"
                    )));
                }
            }
        }

        if changes.is_empty() {
            return Ok(author);
        }

        author.apply(changes);
        let saved = self
            .authors
            .save(author)
            .await
            .map_err(or_not_found("Author", id))?;
        tracing::info!(author_id = id, "Author updated");
        Ok(saved)
    }

    /// Deletion is refused while any post still references the author.
    pub async fn delete_author(&self, id: i64) -> DomainResult<()> {
        if !self.authors.exists_by_id(id).await? {
            return Err(DomainError::not_found("Author", id));
        }

        let posts = self.authors.count_posts(id).await?;
        if posts > 0 {
            return Err(DomainError::Conflict(format!(
                "Author with id {id} still has {posts} post(s); reassign or delete them first"
            )));
        }

        self.authors
            .delete(id)
            .await
            .map_err(or_not_found("Author", id))?;
        tracing::info!(author_id = id, "Author deleted");
        Ok(())
    }

    /// Blank search terms return every author.
    pub async fn search_by_name(&self, term: &str) -> DomainResult<Vec<Author>> {
        let term = term.trim();
        if term.is_empty() {
            return self.list_authors().await;
        }
        tracing::debug!(term, "Searching authors by name");
        Ok(self.authors.search_by_name(term).await?)
    }

    pub async fn exists_by_email(&self, email: &str) -> DomainResult<bool> {
        let email = email.trim();
        if email.is_empty() {
            return Ok(false);
        }
        Ok(self.authors.exists_by_email(email).await?)
    }

    pub async fn count(&self) -> DomainResult<u64> {
        Ok(self.authors.count().await?)
    }

    pub async fn list_with_post_counts(&self) -> DomainResult<Vec<AuthorWithPostCount>> {
        let authors = self.authors.find_all().await?;
        let mut result = Vec::with_capacity(authors.len());
        for author in authors {
            let post_count = self.authors.count_posts(author.id).await?;
            result.push(AuthorWithPostCount { author, post_count });
        }
        Ok(result)
    }
}

fn check_optional_fields(errors: &mut FieldErrors, bio: Option<&str>, website: Option<&str>) {
    if let Some(bio) = bio {
        errors.max_chars("bio", bio, BIO_MAX_CHARS);
    }
    if let Some(website) = website {
        errors.website("website", website);
    }
}
