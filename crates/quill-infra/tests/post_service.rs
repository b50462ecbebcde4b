mod common;

use chrono::{NaiveDate, Utc};

use quill_core::DomainError;
use quill_core::domain::{PostChanges, PostDraft};
use quill_core::service::LAST_CATEGORY;

use common::{ids, services};

fn field_errors(err: DomainError) -> Vec<String> {
    match err {
        DomainError::Validation { field_errors, .. } => field_errors.into_keys().collect(),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_post_resolves_references() {
    let s = services();
    let jane = s.author("Jane", "jane@x.com").await;
    let tech = s.category("Tech").await;

    let post = s
        .posts
        .create_post(PostDraft {
            title: "Hi".into(),
            author_id: Some(jane.id),
            category_ids: vec![tech.id],
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(post.author_id, jane.id);
    assert_eq!(ids(&post), vec![tech.id]);
    assert_eq!(post.date, Utc::now().date_naive());

    // Assigning the same category again leaves the set as it was.
    let again = s.posts.assign_category(post.id, tech.id).await.unwrap();
    assert_eq!(ids(&again), vec![tech.id]);
}

#[tokio::test]
async fn test_create_post_with_unknown_author_persists_nothing() {
    let s = services();
    let tech = s.category("Tech").await;

    let err = s
        .posts
        .create_post(PostDraft {
            title: "Hi".into(),
            author_id: Some(404),
            category_ids: vec![tech.id],
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::NotFound { entity_type: "Author", id: 404 }));
    assert_eq!(s.posts.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_post_reports_first_missing_category() {
    let s = services();
    let jane = s.author("Jane", "jane@x.com").await;
    let tech = s.category("Tech").await;

    let err = s
        .posts
        .create_post(PostDraft {
            title: "Hi".into(),
            author_id: Some(jane.id),
            category_ids: vec![tech.id, 77, 55],
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::NotFound { entity_type: "Category", id: 77 }));
    assert_eq!(s.posts.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_post_requires_title_author_and_categories() {
    let s = services();

    let err = s
        .posts
        .create_post(PostDraft {
            title: "   ".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert_eq!(field_errors(err), vec!["authorId", "categoryIds", "title"]);
}

#[tokio::test]
async fn test_create_post_with_empty_categories_is_validation_error() {
    let s = services();
    let jane = s.author("Jane", "jane@x.com").await;

    let err = s
        .posts
        .create_post(PostDraft {
            title: "Hi".into(),
            author_id: Some(jane.id),
            category_ids: vec![],
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert_eq!(field_errors(err), vec!["categoryIds"]);
}

#[tokio::test]
async fn test_duplicate_category_ids_collapse() {
    let s = services();
    let jane = s.author("Jane", "jane@x.com").await;
    let tech = s.category("Tech").await;

    let post = s.post("Hi", jane.id, &[tech.id, tech.id]).await;
    assert_eq!(ids(&post), vec![tech.id]);
}

#[tokio::test]
async fn test_update_title_only_preserves_references() {
    let s = services();
    let jane = s.author("Jane", "jane@x.com").await;
    let tech = s.category("Tech").await;
    let rust = s.category("Rust").await;
    let post = s.post("Hi", jane.id, &[tech.id, rust.id]).await;

    let updated = s
        .posts
        .update_post(
            post.id,
            PostChanges {
                title: Some("X".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "X");
    assert_eq!(updated.author_id, jane.id);
    assert_eq!(updated.category_ids, post.category_ids);
    assert_eq!(updated.date, post.date);
    assert_eq!(updated.content, post.content);
}

#[tokio::test]
async fn test_update_replaces_category_set() {
    let s = services();
    let jane = s.author("Jane", "jane@x.com").await;
    let tech = s.category("Tech").await;
    let rust = s.category("Rust").await;
    let life = s.category("Life").await;
    let post = s.post("Hi", jane.id, &[tech.id, rust.id]).await;

    let updated = s
        .posts
        .update_post(
            post.id,
            PostChanges {
                category_ids: Some(vec![life.id]),
                date: NaiveDate::from_ymd_opt(2023, 12, 24),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(ids(&updated), vec![life.id]);
    assert_eq!(updated.date, NaiveDate::from_ymd_opt(2023, 12, 24).unwrap());
}

#[tokio::test]
async fn test_update_with_bad_reference_changes_nothing() {
    let s = services();
    let jane = s.author("Jane", "jane@x.com").await;
    let tech = s.category("Tech").await;
    let post = s.post("Hi", jane.id, &[tech.id]).await;

    let err = s
        .posts
        .update_post(
            post.id,
            PostChanges {
                title: Some("Changed".into()),
                author_id: Some(999),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity_type: "Author", .. }));

    let err = s
        .posts
        .update_post(
            post.id,
            PostChanges {
                category_ids: Some(vec![]),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(field_errors(err), vec!["categoryIds"]);

    let stored = s.posts.get_post(post.id).await.unwrap();
    assert_eq!(stored, post);
}

#[tokio::test]
async fn test_update_missing_post_is_not_found() {
    let s = services();
    let err = s
        .posts
        .update_post(1, PostChanges::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity_type: "Post", id: 1 }));
}

#[tokio::test]
async fn test_assign_author_is_idempotent() {
    let s = services();
    let jane = s.author("Jane", "jane@x.com").await;
    let joe = s.author("Joe", "joe@x.com").await;
    let tech = s.category("Tech").await;
    let post = s.post("Hi", jane.id, &[tech.id]).await;

    let first = s.posts.assign_author(post.id, joe.id).await.unwrap();
    let second = s.posts.assign_author(post.id, joe.id).await.unwrap();
    assert_eq!(first.author_id, joe.id);
    assert_eq!(first, second);

    let err = s.posts.assign_author(post.id, 404).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity_type: "Author", .. }));
    let err = s.posts.assign_author(404, joe.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity_type: "Post", .. }));
}

#[tokio::test]
async fn test_assign_category_adds_once() {
    let s = services();
    let jane = s.author("Jane", "jane@x.com").await;
    let tech = s.category("Tech").await;
    let rust = s.category("Rust").await;
    let post = s.post("Hi", jane.id, &[tech.id]).await;

    let first = s.posts.assign_category(post.id, rust.id).await.unwrap();
    let second = s.posts.assign_category(post.id, rust.id).await.unwrap();
    assert_eq!(ids(&first), vec![tech.id, rust.id]);
    assert_eq!(first.category_ids.len(), second.category_ids.len());

    let err = s.posts.assign_category(post.id, 404).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity_type: "Category", .. }));
}

#[tokio::test]
async fn test_remove_last_category_is_rejected() {
    let s = services();
    let jane = s.author("Jane", "jane@x.com").await;
    let tech = s.category("Tech").await;
    let post = s.post("Hi", jane.id, &[tech.id]).await;

    let err = s.posts.remove_category(post.id, tech.id).await.unwrap_err();
    match err {
        DomainError::Validation { message, .. } => assert_eq!(message, LAST_CATEGORY),
        other => panic!("unexpected error: {other:?}"),
    }

    let stored = s.posts.get_post(post.id).await.unwrap();
    assert_eq!(ids(&stored), vec![tech.id]);
}

#[tokio::test]
async fn test_remove_category() {
    let s = services();
    let jane = s.author("Jane", "jane@x.com").await;
    let tech = s.category("Tech").await;
    let rust = s.category("Rust").await;
    let post = s.post("Hi", jane.id, &[tech.id, rust.id]).await;

    let updated = s.posts.remove_category(post.id, tech.id).await.unwrap();
    assert_eq!(ids(&updated), vec![rust.id]);

    // Removing a category the post does not have is a no-op.
    let unchanged = s.posts.remove_category(post.id, 999).await.unwrap();
    assert_eq!(unchanged, updated);
}

#[tokio::test]
async fn test_delete_post() {
    let s = services();
    let jane = s.author("Jane", "jane@x.com").await;
    let tech = s.category("Tech").await;
    let post = s.post("Hi", jane.id, &[tech.id]).await;

    s.posts.delete_post(post.id).await.unwrap();
    let err = s.posts.delete_post(post.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity_type: "Post", .. }));
}

#[tokio::test]
async fn test_search_by_title() {
    let s = services();
    let jane = s.author("Jane", "jane@x.com").await;
    let tech = s.category("Tech").await;
    s.post("Spring Basics", jane.id, &[tech.id]).await;
    s.post("Rust in Action", jane.id, &[tech.id]).await;
    s.post("Advanced spring", jane.id, &[tech.id]).await;

    let all = s.posts.list_posts().await.unwrap();
    assert_eq!(s.posts.search_by_title("").await.unwrap(), all);
    assert_eq!(s.posts.search_by_title("   ").await.unwrap(), all);

    let titles: Vec<String> = s
        .posts
        .search_by_title("SPRING")
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.title)
        .collect();
    assert_eq!(titles, vec!["Spring Basics", "Advanced spring"]);
}

#[tokio::test]
async fn test_paged_listing() {
    let s = services();
    let jane = s.author("Jane", "jane@x.com").await;
    let tech = s.category("Tech").await;
    for n in 1..=12 {
        s.post(&format!("Post {n:02}"), jane.id, &[tech.id]).await;
    }

    let page = s.posts.list_paged(2, 5, "id").await.unwrap();
    assert_eq!(page.content.len(), 2);
    assert_eq!(page.total_elements, 12);
    assert_eq!(page.total_pages(), 3);
    assert!(!page.is_first());
    assert!(page.is_last());

    let first = s.posts.list_paged(0, 5, "title").await.unwrap();
    assert!(first.is_first());
    assert!(!first.is_last());
    assert_eq!(first.content[0].title, "Post 01");
}

#[tokio::test]
async fn test_paged_listing_rejects_unknown_sort_field() {
    let s = services();
    let err = s.posts.list_paged(0, 5, "popularity").await.unwrap_err();
    assert_eq!(field_errors(err), vec!["sortedBy"]);

    let err = s.posts.list_paged(0, 0, "id").await.unwrap_err();
    assert_eq!(field_errors(err), vec!["size"]);
}

#[tokio::test]
async fn test_paged_listing_breaks_ties_by_id() {
    let s = services();
    let jane = s.author("Jane", "jane@x.com").await;
    let tech = s.category("Tech").await;
    let same_day = NaiveDate::from_ymd_opt(2024, 3, 1);
    let mut tied = Vec::new();
    for title in ["Charlie", "alpha", "Bravo", "Delta"] {
        let post = s
            .posts
            .create_post(PostDraft {
                title: title.into(),
                date: same_day,
                author_id: Some(jane.id),
                category_ids: vec![tech.id],
                ..Default::default()
            })
            .await
            .unwrap();
        tied.push(post.id);
    }
    // An earlier post sorts ahead of the tied group.
    let early = s
        .posts
        .create_post(PostDraft {
            title: "Early".into(),
            date: NaiveDate::from_ymd_opt(2023, 1, 1),
            author_id: Some(jane.id),
            category_ids: vec![tech.id],
            ..Default::default()
        })
        .await
        .unwrap();

    let page = s.posts.list_paged(0, 5, "date").await.unwrap();
    let order: Vec<i64> = page.content.iter().map(|p| p.id).collect();
    let mut expected = vec![early.id];
    expected.extend(&tied);
    assert_eq!(order, expected);

    let second = s.posts.list_paged(1, 2, "date").await.unwrap();
    let order: Vec<i64> = second.content.iter().map(|p| p.id).collect();
    assert_eq!(order, vec![tied[1], tied[2]]);
}

#[tokio::test]
async fn test_paged_listing_rejects_overflowing_page() {
    let s = services();
    let err = s.posts.list_paged(u64::MAX, 5, "id").await.unwrap_err();
    assert_eq!(field_errors(err), vec!["page"]);
}

#[tokio::test]
async fn test_list_by_author_and_category() {
    let s = services();
    let jane = s.author("Jane", "jane@x.com").await;
    let joe = s.author("Joe", "joe@x.com").await;
    let tech = s.category("Tech").await;
    let life = s.category("Life").await;
    let a = s.post("A", jane.id, &[tech.id]).await;
    let b = s.post("B", joe.id, &[tech.id, life.id]).await;
    let c = s.post("C", jane.id, &[life.id]).await;

    let by_jane: Vec<i64> = s.posts.list_by_author(jane.id).await.unwrap().iter().map(|p| p.id).collect();
    assert_eq!(by_jane, vec![a.id, c.id]);

    let in_life: Vec<i64> = s.posts.list_by_category(life.id).await.unwrap().iter().map(|p| p.id).collect();
    assert_eq!(in_life, vec![b.id, c.id]);

    assert!(matches!(
        s.posts.list_by_author(404).await.unwrap_err(),
        DomainError::NotFound { entity_type: "Author", .. }
    ));
    assert!(matches!(
        s.posts.list_by_category(404).await.unwrap_err(),
        DomainError::NotFound { entity_type: "Category", .. }
    ));
}
