mod common;

use quill_core::DomainError;
use quill_core::mapper::post_page_response;
use quill_shared::dto::PostSummary;

use common::{ids, services};

#[tokio::test]
async fn test_summary_to_post_resolves_references() {
    let s = services();
    let jane = s.author("Jane", "jane@x.com").await;
    let joe = s.author("Joe", "joe@x.com").await;
    let tech = s.category("Tech").await;
    let life = s.category("Life").await;
    let post = s.post("Hi", jane.id, &[tech.id]).await;

    let summary = PostSummary {
        id: post.id,
        title: "Renamed".into(),
        author_id: joe.id,
        category_ids: vec![life.id, tech.id],
    };
    let rebuilt = s.mapper.summary_to_post(&summary).await.unwrap();

    assert_eq!(rebuilt.title, "Renamed");
    assert_eq!(rebuilt.author_id, joe.id);
    assert_eq!(ids(&rebuilt), vec![tech.id, life.id]);
    assert_eq!(rebuilt.date, post.date);
}

#[tokio::test]
async fn test_summary_with_unknown_reference_is_not_found() {
    let s = services();
    let jane = s.author("Jane", "jane@x.com").await;
    let tech = s.category("Tech").await;
    let post = s.post("Hi", jane.id, &[tech.id]).await;

    let summary = PostSummary {
        id: post.id,
        title: post.title.clone(),
        author_id: jane.id,
        category_ids: vec![tech.id, 42],
    };
    let err = s.mapper.summary_to_post(&summary).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity_type: "Category", id: 42 }));

    let summary = PostSummary { author_id: 42, ..summary };
    let err = s.mapper.summary_to_post(&summary).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity_type: "Author", id: 42 }));
}

#[tokio::test]
async fn test_page_response_flags() {
    let s = services();
    let jane = s.author("Jane", "jane@x.com").await;
    let tech = s.category("Tech").await;
    for n in 0..12 {
        s.post(&format!("Post {n}"), jane.id, &[tech.id]).await;
    }

    let page = post_page_response(s.posts.list_paged(2, 5, "id").await.unwrap());
    assert_eq!(page.number_of_elements, 2);
    assert_eq!(page.total_elements, 12);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.page_number, 2);
    assert!(!page.first);
    assert!(page.last);
    assert!(page.content.iter().all(|p| p.category_ids == vec![tech.id]));
}

#[tokio::test]
async fn test_summary_without_categories_is_rejected() {
    let s = services();
    let jane = s.author("Jane", "jane@x.com").await;
    let tech = s.category("Tech").await;
    let post = s.post("Hi", jane.id, &[tech.id]).await;

    let summary = PostSummary {
        id: post.id,
        title: post.title.clone(),
        author_id: jane.id,
        category_ids: vec![],
    };
    match s.mapper.summary_to_post(&summary).await.unwrap_err() {
        DomainError::Validation { field_errors, .. } => {
            assert!(field_errors.contains_key("categoryIds"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

