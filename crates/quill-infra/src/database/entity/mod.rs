//! SeaORM entities mirroring the `create_blog_tables` migration.

pub mod author;
pub mod category;
pub mod post;
pub mod post_category;
