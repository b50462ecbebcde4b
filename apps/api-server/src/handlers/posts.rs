//! Post handlers, including the author and category assignment routes.

use actix_web::{HttpResponse, web};

use quill_core::mapper::post_page_response;
use quill_shared::dto::{
    CreatePostRequest, KeywordQuery, PageQuery, PostResponse, PostSummary, UpdatePostRequest,
};
use quill_shared::response::{MessageResponse, PostCountResponse};

use super::responses;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts?page=&size=&sortedBy=
///
/// Defaults: page 0, the configured page size, sorted by id.
pub async fn list_paged(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let PageQuery {
        page,
        size,
        sorted_by,
    } = query.into_inner();
    let page = state
        .posts
        .list_paged(
            page.unwrap_or(0),
            size.unwrap_or(state.default_page_size),
            sorted_by.as_deref().unwrap_or("id"),
        )
        .await?;
    Ok(HttpResponse::Ok().json(post_page_response(page)))
}

/// GET /api/posts/summaries
pub async fn summaries(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list_posts().await?;
    Ok(HttpResponse::Ok().json(responses::<_, PostSummary>(posts)))
}

/// GET /api/posts/count
pub async fn count(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let total_posts = state.posts.count().await?;
    Ok(HttpResponse::Ok().json(PostCountResponse { total_posts }))
}

/// GET /api/posts/search?keyword=
pub async fn search(
    state: web::Data<AppState>,
    query: web::Query<KeywordQuery>,
) -> AppResult<HttpResponse> {
    let posts = state.posts.search_by_title(&query.keyword).await?;
    Ok(HttpResponse::Ok().json(responses::<_, PostResponse>(posts)))
}

/// GET /api/posts/author/{authorId}
pub async fn by_author(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let posts = state.posts.list_by_author(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(responses::<_, PostResponse>(posts)))
}

/// GET /api/posts/category/{categoryId}
pub async fn by_category(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let posts = state.posts.list_by_category(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(responses::<_, PostResponse>(posts)))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let post = state.posts.create_post(body.into_inner().into()).await?;
    Ok(HttpResponse::Created().json(PostResponse::from(post)))
}

/// GET /api/posts/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let post = state.posts.get_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

/// PUT /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .update_post(path.into_inner(), body.into_inner().into())
        .await?;
    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

/// DELETE /api/posts/{id}
pub async fn delete(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    state.posts.delete_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Post deleted successfully")))
}

/// PUT /api/posts/{postId}/author/{authorId}
pub async fn assign_author(
    state: web::Data<AppState>,
    path: web::Path<(i64, i64)>,
) -> AppResult<HttpResponse> {
    let (post_id, author_id) = path.into_inner();
    let post = state.posts.assign_author(post_id, author_id).await?;
    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

/// PUT /api/posts/{postId}/category/{categoryId}
pub async fn assign_category(
    state: web::Data<AppState>,
    path: web::Path<(i64, i64)>,
) -> AppResult<HttpResponse> {
    let (post_id, category_id) = path.into_inner();
    let post = state.posts.assign_category(post_id, category_id).await?;
    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

/// DELETE /api/posts/{postId}/category/{categoryId}
pub async fn remove_category(
    state: web::Data<AppState>,
    path: web::Path<(i64, i64)>,
) -> AppResult<HttpResponse> {
    let (post_id, category_id) = path.into_inner();
    let post = state.posts.remove_category(post_id, category_id).await?;
    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}
