//! Paging and sorting for post listings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Column a page of posts is ordered by. Ties are always broken by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PostSortField {
    #[default]
    Id,
    Title,
    Date,
    CreatedAt,
    UpdatedAt,
}

impl PostSortField {
    pub const ACCEPTED: &'static str = "id, title, date, createdAt, updatedAt";

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Date => "date",
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
        }
    }
}

impl fmt::Display for PostSortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostSortField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "id" => Ok(Self::Id),
            "title" => Ok(Self::Title),
            "date" => Ok(Self::Date),
            "createdAt" | "created_at" => Ok(Self::CreatedAt),
            "updatedAt" | "updated_at" => Ok(Self::UpdatedAt),
            other => Err(DomainError::invalid_field(
                "sortedBy",
                format!(
                    "Unknown sort field '{}'; expected one of {}",
                    other,
                    Self::ACCEPTED
                ),
            )),
        }
    }
}

/// A validated page request. `page` is zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
    pub sort: PostSortField,
}

impl PageRequest {
    pub fn new(page: u64, size: u64, sort: PostSortField) -> Result<Self, DomainError> {
        if size == 0 {
            return Err(DomainError::invalid_field(
                "size",
                "Page size must be greater than zero",
            ));
        }
        // Offsets are bound as signed 64-bit values by the SQL store.
        let in_range = page
            .checked_mul(size)
            .is_some_and(|offset| offset <= i64::MAX as u64);
        if !in_range {
            return Err(DomainError::invalid_field(
                "page",
                "Page number is out of range for this page size",
            ));
        }
        Ok(Self { page, size, sort })
    }

    /// Index of the first element of this page.
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }
}

/// One page of a sorted listing plus the totals needed to navigate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page_number: u64,
    pub page_size: u64,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            page_number: request.page,
            page_size: request.size,
            total_elements,
        }
    }

    pub fn total_pages(&self) -> u64 {
        self.total_elements.div_ceil(self.page_size)
    }

    pub fn is_first(&self) -> bool {
        self.page_number == 0
    }

    pub fn is_last(&self) -> bool {
        self.page_number.saturating_add(1) >= self.total_pages()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page_number: self.page_number,
            page_size: self.page_size,
            total_elements: self.total_elements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_partial_page() {
        let request = PageRequest::new(2, 5, PostSortField::Id).unwrap();
        let page = Page::new(vec![11, 12], &request, 12);
        assert_eq!(page.total_pages(), 3);
        assert!(!page.is_first());
        assert!(page.is_last());
        assert_eq!(request.offset(), 10);
    }

    #[test]
    fn test_empty_listing_is_first_and_last() {
        let request = PageRequest::new(0, 5, PostSortField::Id).unwrap();
        let page: Page<i64> = Page::new(Vec::new(), &request, 0);
        assert_eq!(page.total_pages(), 0);
        assert!(page.is_first());
        assert!(page.is_last());
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(
            PageRequest::new(0, 0, PostSortField::Id),
            Err(DomainError::Validation { .. })
        ));
    }

    #[test]
    fn test_out_of_range_page_rejected() {
        for (page, size) in [(u64::MAX, 5), (u64::MAX, 1), (i64::MAX as u64, 2)] {
            match PageRequest::new(page, size, PostSortField::Id) {
                Err(DomainError::Validation { field_errors, .. }) => {
                    assert!(field_errors.contains_key("page"));
                }
                other => panic!("expected page validation error, got {other:?}"),
            }
        }
        assert!(PageRequest::new(i64::MAX as u64, 1, PostSortField::Id).is_ok());
    }

    #[test]
    fn test_is_last_saturates_at_max_page_number() {
        let page: Page<i64> = Page {
            content: Vec::new(),
            page_number: u64::MAX,
            page_size: 5,
            total_elements: 12,
        };
        assert!(page.is_last());
        assert!(!page.is_first());
    }

    #[test]
    fn test_sort_field_parsing() {
        assert_eq!("title".parse::<PostSortField>().unwrap(), PostSortField::Title);
        assert_eq!("created_at".parse::<PostSortField>().unwrap(), PostSortField::CreatedAt);
        assert_eq!("updatedAt".parse::<PostSortField>().unwrap(), PostSortField::UpdatedAt);
        assert!("popularity".parse::<PostSortField>().is_err());
    }
}
