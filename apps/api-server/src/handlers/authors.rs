//! Author handlers.

use actix_web::{HttpResponse, web};

use quill_shared::dto::{
    AuthorResponse, AuthorWithPostCountResponse, CreateAuthorRequest, EmailQuery, NameQuery,
    UpdateAuthorRequest,
};
use quill_shared::response::{AuthorCountResponse, ExistsResponse, MessageResponse};

use super::responses;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/authors
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let authors = state.authors.list_authors().await?;
    Ok(HttpResponse::Ok().json(responses::<_, AuthorResponse>(authors)))
}

/// POST /api/authors
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreateAuthorRequest>,
) -> AppResult<HttpResponse> {
    let author = state.authors.create_author(body.into_inner().into()).await?;
    Ok(HttpResponse::Created().json(AuthorResponse::from(author)))
}

/// GET /api/authors/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let author = state.authors.get_author(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(AuthorResponse::from(author)))
}

/// PUT /api/authors/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<UpdateAuthorRequest>,
) -> AppResult<HttpResponse> {
    let author = state
        .authors
        .update_author(path.into_inner(), body.into_inner().into())
        .await?;
    Ok(HttpResponse::Ok().json(AuthorResponse::from(author)))
}

/// DELETE /api/authors/{id}
pub async fn delete(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    state.authors.delete_author(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Author deleted successfully")))
}

/// GET /api/authors/count
pub async fn count(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let total_authors = state.authors.count().await?;
    Ok(HttpResponse::Ok().json(AuthorCountResponse { total_authors }))
}

/// GET /api/authors/search?name=
pub async fn search(
    state: web::Data<AppState>,
    query: web::Query<NameQuery>,
) -> AppResult<HttpResponse> {
    let authors = state.authors.search_by_name(&query.name).await?;
    Ok(HttpResponse::Ok().json(responses::<_, AuthorResponse>(authors)))
}

/// GET /api/authors/exists?email=
pub async fn exists(
    state: web::Data<AppState>,
    query: web::Query<EmailQuery>,
) -> AppResult<HttpResponse> {
    let exists = state.authors.exists_by_email(&query.email).await?;
    Ok(HttpResponse::Ok().json(ExistsResponse { exists }))
}

/// GET /api/authors/with-counts
pub async fn with_counts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let authors = state.authors.list_with_post_counts().await?;
    Ok(HttpResponse::Ok().json(responses::<_, AuthorWithPostCountResponse>(authors)))
}
