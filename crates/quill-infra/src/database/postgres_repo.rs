//! PostgreSQL repository implementations.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbConn, DbErr, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait, Unchanged,
};

use quill_core::domain::{
    Author, Category, NewAuthor, NewCategory, NewPost, Page, PageRequest, Post, PostSortField,
};
use quill_core::error::RepoError;
use quill_core::ports::{AuthorRepository, BaseRepository, CategoryRepository, PostRepository};
use quill_core::service::mask_email;

use super::entity::author::{self, Entity as AuthorEntity};
use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_category::{self, Entity as PostCategoryEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL author repository.
pub type PostgresAuthorRepository = PostgresBaseRepository<AuthorEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// `lower(column) = lower(value)`
fn equals_ignore_case<C: ColumnTrait>(column: C, value: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).eq(value.trim().to_lowercase())
}

/// `lower(column) LIKE '%term%'`, with LIKE wildcards in `term` escaped.
fn contains_ignore_case<C: ColumnTrait>(column: C, term: &str) -> SimpleExpr {
    let escaped = term
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Expr::expr(Func::lower(Expr::col(column)))
        .like(LikeExpr::new(format!("%{escaped}%")).escape('\\'))
}

#[async_trait]
impl AuthorRepository for PostgresAuthorRepository {
    async fn create(&self, author: NewAuthor) -> Result<Author, RepoError> {
        let now = Utc::now().fixed_offset();
        let model = author::ActiveModel {
            id: NotSet,
            name: Set(author.name),
            email: Set(author.email),
            bio: Set(author.bio),
            website: Set(author.website),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn find_all(&self) -> Result<Vec<Author>, RepoError> {
        let result = AuthorEntity::find()
            .order_by_asc(author::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Author>, RepoError> {
        tracing::debug!(author_email = %mask_email(email), "Finding author by email");

        let result = AuthorEntity::find()
            .filter(equals_ignore_case(author::Column::Email, email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepoError> {
        let count = AuthorEntity::find()
            .filter(equals_ignore_case(author::Column::Email, email))
            .count(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(count > 0)
    }

    async fn search_by_name(&self, term: &str) -> Result<Vec<Author>, RepoError> {
        let result = AuthorEntity::find()
            .filter(contains_ignore_case(author::Column::Name, term))
            .order_by_asc(author::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count_posts(&self, author_id: i64) -> Result<u64, RepoError> {
        PostEntity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn create(&self, category: NewCategory) -> Result<Category, RepoError> {
        let now = Utc::now().fixed_offset();
        let model = category::ActiveModel {
            id: NotSet,
            name: Set(category.name),
            description: Set(category.description),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn find_all(&self) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .order_by_asc(category::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(equals_ignore_case(category::Column::Name, name))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool, RepoError> {
        let count = CategoryEntity::find()
            .filter(equals_ignore_case(category::Column::Name, name))
            .count(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(count > 0)
    }

    async fn search_by_name(&self, term: &str) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(contains_ignore_case(category::Column::Name, term))
            .order_by_asc(category::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// PostgreSQL post repository.
///
/// A post spans the `posts` row and its `post_categories` links; writes
/// touch both inside one transaction.
pub struct PostgresPostRepository {
    pub(crate) db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Loads the category links for `models` and assembles domain posts,
    /// preserving the order of `models`.
    async fn with_categories(&self, models: Vec<post::Model>) -> Result<Vec<Post>, RepoError> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let links = PostCategoryEntity::find()
            .filter(post_category::Column::PostId.is_in(ids))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        let mut by_post: HashMap<i64, BTreeSet<i64>> = HashMap::new();
        for link in links {
            by_post
                .entry(link.post_id)
                .or_default()
                .insert(link.category_id);
        }

        Ok(models
            .into_iter()
            .map(|model| {
                let category_ids = by_post.remove(&model.id).unwrap_or_default();
                to_domain(model, category_ids)
            })
            .collect())
    }

    /// Rewrites the link rows of `post_id` to exactly `category_ids`.
    async fn replace_links<C: ConnectionTrait>(
        conn: &C,
        post_id: i64,
        category_ids: &BTreeSet<i64>,
    ) -> Result<(), DbErr> {
        PostCategoryEntity::delete_many()
            .filter(post_category::Column::PostId.eq(post_id))
            .exec(conn)
            .await?;

        if category_ids.is_empty() {
            return Ok(());
        }

        let links = category_ids.iter().map(|&category_id| post_category::ActiveModel {
            post_id: Set(post_id),
            category_id: Set(category_id),
        });
        PostCategoryEntity::insert_many(links).exec(conn).await?;
        Ok(())
    }
}

fn to_domain(model: post::Model, category_ids: BTreeSet<i64>) -> Post {
    Post {
        id: model.id,
        title: model.title,
        content: model.content,
        date: model.date,
        author_id: model.author_id,
        category_ids,
        created_at: model.created_at.into(),
        updated_at: model.updated_at.into(),
    }
}

fn sort_column(field: PostSortField) -> post::Column {
    match field {
        PostSortField::Id => post::Column::Id,
        PostSortField::Title => post::Column::Title,
        PostSortField::Date => post::Column::Date,
        PostSortField::CreatedAt => post::Column::CreatedAt,
        PostSortField::UpdatedAt => post::Column::UpdatedAt,
    }
}

#[async_trait]
impl BaseRepository<Post, i64> for PostgresPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        let Some(model) = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        Ok(self.with_categories(vec![model]).await?.pop())
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, RepoError> {
        let count = PostEntity::find_by_id(id)
            .count(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(count > 0)
    }

    async fn count(&self) -> Result<u64, RepoError> {
        PostEntity::find().count(&self.db).await.map_err(map_db_err)
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let model = post::ActiveModel {
            id: Unchanged(post.id),
            title: Set(post.title),
            content: Set(post.content),
            date: Set(post.date),
            author_id: Set(post.author_id),
            created_at: NotSet,
            updated_at: Set(Utc::now().fixed_offset()),
        }
        .update(&txn)
        .await
        .map_err(map_db_err)?;

        Self::replace_links(&txn, model.id, &post.category_ids)
            .await
            .map_err(map_db_err)?;
        txn.commit().await.map_err(map_db_err)?;

        Ok(to_domain(model, post.category_ids))
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        // Link rows go with the post via ON DELETE CASCADE.
        let result = PostEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, RepoError> {
        let now = Utc::now().fixed_offset();
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let model = post::ActiveModel {
            id: NotSet,
            title: Set(post.title),
            content: Set(post.content),
            date: Set(post.date),
            author_id: Set(post.author_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(map_db_err)?;

        Self::replace_links(&txn, model.id, &post.category_ids)
            .await
            .map_err(map_db_err)?;
        txn.commit().await.map_err(map_db_err)?;

        Ok(to_domain(model, post.category_ids))
    }

    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        let models = PostEntity::find()
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        self.with_categories(models).await
    }

    async fn search_by_title(&self, keyword: &str) -> Result<Vec<Post>, RepoError> {
        let models = PostEntity::find()
            .filter(contains_ignore_case(post::Column::Title, keyword))
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        self.with_categories(models).await
    }

    async fn find_by_author_id(&self, author_id: i64) -> Result<Vec<Post>, RepoError> {
        let models = PostEntity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        self.with_categories(models).await
    }

    async fn find_by_category_id(&self, category_id: i64) -> Result<Vec<Post>, RepoError> {
        let post_ids: Vec<i64> = PostCategoryEntity::find()
            .filter(post_category::Column::CategoryId.eq(category_id))
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|link| link.post_id)
            .collect();

        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = PostEntity::find()
            .filter(post::Column::Id.is_in(post_ids))
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        self.with_categories(models).await
    }

    async fn count_by_category(&self, category_id: i64) -> Result<u64, RepoError> {
        PostCategoryEntity::find()
            .filter(post_category::Column::CategoryId.eq(category_id))
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }

    async fn find_page(&self, request: &PageRequest) -> Result<Page<Post>, RepoError> {
        let mut query = PostEntity::find();
        if request.sort != PostSortField::Id {
            query = query.order_by_asc(sort_column(request.sort));
        }
        let paginator = query
            .order_by_asc(post::Column::Id)
            .paginate(&self.db, request.size);

        let total = paginator.num_items().await.map_err(map_db_err)?;
        let models = paginator
            .fetch_page(request.page)
            .await
            .map_err(map_db_err)?;

        let posts = self.with_categories(models).await?;
        Ok(Page::new(posts, request, total))
    }
}
