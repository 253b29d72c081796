//! Product HTTP handlers
//!
//! Listing accepts raw query strings; values that do not parse are ignored
//! rather than rejected.

use actix_web::{delete, get, post, put, web, HttpResponse};
use uuid::Uuid;

use simshop_core::models::{NewProduct, ProductQuery, ProductUpdate};
use simshop_core::{Capability, ShopConfig};

use crate::errors::ApiResult;
use crate::middleware::AuthenticatedUser;
use crate::repository::CatalogRepository;

/// Configure product routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/products")
            .service(search_products)
            .service(get_product)
            .service(create_product)
            .service(update_product)
            .service(delete_product),
    );
}

/// Search products with filters
#[get("")]
async fn search_products(
    repo: web::Data<CatalogRepository>,
    config: web::Data<ShopConfig>,
    query: web::Query<ProductQuery>,
) -> ApiResult<HttpResponse> {
    let filter = query.to_filter(config.catalog.max_page_size);
    let products = repo.list_products(filter).await?;
    Ok(HttpResponse::Ok().json(products))
}

/// Get product by slug
#[get("/{slug}")]
async fn get_product(
    repo: web::Data<CatalogRepository>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let product = repo.product_by_slug(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(product))
}

#[post("")]
async fn create_product(
    repo: web::Data<CatalogRepository>,
    user: AuthenticatedUser,
    body: web::Json<NewProduct>,
) -> ApiResult<HttpResponse> {
    user.require(Capability::ManageCatalog)?;
    let product = repo.create_product(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(product))
}

#[put("/{id}")]
async fn update_product(
    repo: web::Data<CatalogRepository>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<ProductUpdate>,
) -> ApiResult<HttpResponse> {
    user.require(Capability::ManageCatalog)?;
    let product = repo
        .update_product(path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(product))
}

#[delete("/{id}")]
async fn delete_product(
    repo: web::Data<CatalogRepository>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    user.require(Capability::ManageCatalog)?;
    repo.delete_product(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
