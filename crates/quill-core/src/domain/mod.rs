//! Domain entities - the core business objects.

mod author;
mod category;
mod page;
mod post;

pub use author::{Author, AuthorChanges, AuthorWithPostCount, NewAuthor};
pub use category::{Category, CategoryChanges, NewCategory};
pub use page::{Page, PageRequest, PostSortField};
pub use post::{NewPost, Post, PostChanges, PostDraft};
