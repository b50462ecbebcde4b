use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};

use crate::database::entity::{author, category, post, post_category};
use crate::database::postgres_repo::{
    PostgresAuthorRepository, PostgresCategoryRepository, PostgresPostRepository,
};
use quill_core::domain::{Author, PageRequest, Post, PostSortField};
use quill_core::error::RepoError;
use quill_core::ports::{AuthorRepository, BaseRepository, CategoryRepository, PostRepository};

fn author_model(id: i64, email: &str) -> author::Model {
    let now = Utc::now().fixed_offset();
    author::Model {
        id,
        name: "Jane".to_owned(),
        email: email.to_owned(),
        bio: None,
        website: Some("https://jane.dev".to_owned()),
        created_at: now,
        updated_at: now,
    }
}

fn post_model(id: i64, title: &str) -> post::Model {
    let now = Utc::now().fixed_offset();
    post::Model {
        id,
        title: title.to_owned(),
        content: Some("Body".to_owned()),
        date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        author_id: 1,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_find_author_by_id() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![author_model(1, "jane@x.com")]])
        .into_connection();

    let repo = PostgresAuthorRepository::new(db);

    let result: Option<Author> = repo.find_by_id(1).await.unwrap();

    let author = result.expect("author should be found");
    assert_eq!(author.email, "jane@x.com");
    assert_eq!(author.website.as_deref(), Some("https://jane.dev"));
}

#[tokio::test]
async fn test_find_author_by_email_is_case_insensitive_query() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![author_model(1, "jane@x.com")]])
        .into_connection();

    let repo = PostgresAuthorRepository::new(db);
    let author = repo.find_by_email("Jane@X.com").await.unwrap();
    assert!(author.is_some());

    let log = repo.db.into_transaction_log();
    let sql = format!("{:?}", log[0]);
    assert!(sql.contains("LOWER"), "query should lower-case the column: {sql}");
    assert!(sql.contains("jane@x.com"));
}

#[tokio::test]
async fn test_find_category_by_name() {
    let now = Utc::now().fixed_offset();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![category::Model {
            id: 10,
            name: "Tech".to_owned(),
            description: None,
            created_at: now,
            updated_at: now,
        }]])
        .into_connection();

    let repo = PostgresCategoryRepository::new(db);
    let category = repo.find_by_name("tech").await.unwrap().unwrap();
    assert_eq!(category.id, 10);
    assert_eq!(category.name, "Tech");
}

#[tokio::test]
async fn test_find_post_by_id_loads_category_links() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(1, "Spring Basics")]])
        .append_query_results(vec![vec![
            post_category::Model {
                post_id: 1,
                category_id: 20,
            },
            post_category::Model {
                post_id: 1,
                category_id: 10,
            },
        ]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let post: Post = repo.find_by_id(1).await.unwrap().unwrap();
    assert_eq!(post.title, "Spring Basics");
    assert_eq!(post.category_ids.into_iter().collect::<Vec<_>>(), vec![10, 20]);
}

#[tokio::test]
async fn test_find_missing_post_returns_none() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    assert!(repo.find_by_id(42).await.unwrap().is_none());
}

#[tokio::test]
async fn test_find_posts_by_unused_category_is_empty() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<post_category::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    assert!(repo.find_by_category_id(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    assert!(matches!(repo.delete(9).await, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_find_page_counts_then_fetches_ordered_window() {
    let count_row = BTreeMap::from([("num_items", Value::from(12i64))]);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![count_row]])
        .append_query_results(vec![vec![post_model(11, "Post 11"), post_model(12, "Post 12")]])
        .append_query_results(vec![vec![
            post_category::Model {
                post_id: 11,
                category_id: 10,
            },
            post_category::Model {
                post_id: 12,
                category_id: 10,
            },
        ]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let request = PageRequest::new(2, 5, PostSortField::Date).unwrap();
    let page = repo.find_page(&request).await.unwrap();

    assert_eq!(page.total_elements, 12);
    assert_eq!(page.total_pages(), 3);
    assert!(page.is_last());
    let ids: Vec<i64> = page.content.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![11, 12]);
    assert!(page.content.iter().all(|p| p.category_ids.contains(&10)));

    let log = repo.db.into_transaction_log();
    assert_eq!(log.len(), 3);

    let count = &log[0].statements()[0];
    assert!(count.sql.to_uppercase().contains("COUNT"), "{}", count.sql);

    let fetch = &log[1].statements()[0];
    let order_by = fetch
        .sql
        .split("ORDER BY")
        .nth(1)
        .expect("page query should be ordered");
    let date_at = order_by.find(r#""date""#).expect("ordered by date");
    let id_at = order_by.find(r#""id""#).expect("ties broken by id");
    assert!(date_at < id_at, "date must come before id: {}", fetch.sql);
    assert!(fetch.sql.contains("LIMIT") && fetch.sql.contains("OFFSET"));

    let values = fetch.values.as_ref().map(|v| v.0.clone()).unwrap_or_default();
    assert!(values.contains(&Value::BigUnsigned(Some(5))), "{values:?}");
    assert!(values.contains(&Value::BigUnsigned(Some(10))), "{values:?}");
}
