//! Category handlers.

use actix_web::{HttpResponse, web};

use quill_shared::dto::{
    CategoryResponse, CreateCategoryRequest, NameQuery, UpdateCategoryRequest,
};
use quill_shared::response::ExistsResponse;

use super::responses;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/categories
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories = state.categories.list_categories().await?;
    Ok(HttpResponse::Ok().json(responses::<_, CategoryResponse>(categories)))
}

/// POST /api/categories
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreateCategoryRequest>,
) -> AppResult<HttpResponse> {
    let category = state
        .categories
        .create_category(body.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(CategoryResponse::from(category)))
}

/// GET /api/categories/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let category = state.categories.get_category(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(CategoryResponse::from(category)))
}

/// PUT /api/categories/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<UpdateCategoryRequest>,
) -> AppResult<HttpResponse> {
    let category = state
        .categories
        .update_category(path.into_inner(), body.into_inner().into())
        .await?;
    Ok(HttpResponse::Ok().json(CategoryResponse::from(category)))
}

/// DELETE /api/categories/{id}
pub async fn delete(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    state.categories.delete_category(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/categories/search?name=
pub async fn search(
    state: web::Data<AppState>,
    query: web::Query<NameQuery>,
) -> AppResult<HttpResponse> {
    let categories = state.categories.search_by_name(&query.name).await?;
    Ok(HttpResponse::Ok().json(responses::<_, CategoryResponse>(categories)))
}

/// GET /api/categories/exists?name=
pub async fn exists(
    state: web::Data<AppState>,
    query: web::Query<NameQuery>,
) -> AppResult<HttpResponse> {
    let exists = state.categories.exists_by_name(&query.name).await?;
    Ok(HttpResponse::Ok().json(ExistsResponse { exists }))
}
