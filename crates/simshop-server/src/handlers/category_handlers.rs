//! Category HTTP handlers

use actix_web::{delete, get, post, put, web, HttpResponse};
use uuid::Uuid;

use simshop_core::models::{CategoryUpdate, NewCategory};
use simshop_core::Capability;

use crate::errors::ApiResult;
use crate::middleware::AuthenticatedUser;
use crate::repository::CatalogRepository;

/// Configure category routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/categories")
            .service(list_categories)
            .service(get_category)
            .service(create_category)
            .service(update_category)
            .service(delete_category),
    );
}

/// All categories, by name
#[get("")]
async fn list_categories(repo: web::Data<CatalogRepository>) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(repo.list_categories().await?))
}

/// Get category by slug
#[get("/{slug}")]
async fn get_category(
    repo: web::Data<CatalogRepository>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let category = repo.category_by_slug(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(category))
}

#[post("")]
async fn create_category(
    repo: web::Data<CatalogRepository>,
    user: AuthenticatedUser,
    body: web::Json<NewCategory>,
) -> ApiResult<HttpResponse> {
    user.require(Capability::ManageCatalog)?;
    let category = repo.create_category(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(category))
}

#[put("/{id}")]
async fn update_category(
    repo: web::Data<CatalogRepository>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<CategoryUpdate>,
) -> ApiResult<HttpResponse> {
    user.require(Capability::ManageCatalog)?;
    let category = repo
        .update_category(path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(category))
}

/// Refused with 409 while products still belong to the category
#[delete("/{id}")]
async fn delete_category(
    repo: web::Data<CatalogRepository>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    user.require(Capability::ManageCatalog)?;
    repo.delete_category(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
