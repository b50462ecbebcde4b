//! Application services - the business rules sitting on top of the ports.

mod author_service;
mod category_service;
mod post_service;

pub use author_service::AuthorService;
pub use category_service::CategoryService;
pub use post_service::{LAST_CATEGORY, PostService};
pub(crate) use post_service::CATEGORIES_REQUIRED;

/// Masks the local part of an email so it can be logged without PII.
pub fn mask_email(email: &str) -> String {
    match email.find('@') {
        Some(at_pos) => {
            let (local, domain) = email.split_at(at_pos);
            let masked_local = match local.chars().next() {
                Some(first) if local.chars().count() > 1 => format!("{first}***"),
                _ => "***".to_string(),
            };
            format!("{masked_local}{domain}")
        }
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::mask_email;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("jane@x.com"), "j***@x.com");
        assert_eq!(mask_email("j@x.com"), "***@x.com");
        assert_eq!(mask_email("nope"), "***");
    }
}
