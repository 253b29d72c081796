//! User HTTP handlers
//!
//! Owners may edit their own name, email and password; role and active flag
//! need `ManageUsers`.

use actix_web::{delete, get, put, web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use simshop_core::models::{PaginatedResponse, UserUpdate, DEFAULT_PAGE_SIZE};
use simshop_core::{Capability, ShopConfig};

use crate::errors::ApiResult;
use crate::middleware::AuthenticatedUser;
use crate::repository::UserRepository;
use crate::security::hash_password;

/// Configure user routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/users")
            .service(list_users)
            .service(get_user)
            .service(update_user)
            .service(delete_user),
    );
}

/// Raw pagination parameters; anything unparseable falls back to defaults.
#[derive(Deserialize)]
struct PaginationQuery {
    page: Option<String>,
    limit: Option<String>,
}

impl PaginationQuery {
    fn resolve(&self, max_page_size: u32) -> (u32, u32) {
        let parse = |raw: &Option<String>| {
            raw.as_deref()
                .and_then(|s| s.trim().parse::<u32>().ok())
                .filter(|n| *n > 0)
        };
        let page = parse(&self.page).unwrap_or(1);
        let limit = parse(&self.limit)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(max_page_size.max(1));
        (page, limit)
    }
}

/// List all users with pagination
#[get("")]
async fn list_users(
    repo: web::Data<UserRepository>,
    config: web::Data<ShopConfig>,
    caller: AuthenticatedUser,
    query: web::Query<PaginationQuery>,
) -> ApiResult<HttpResponse> {
    caller.require(Capability::ManageUsers)?;
    let (page, limit) = query.resolve(config.catalog.max_page_size);
    let (users, total) = repo.list(page, limit).await?;

    Ok(HttpResponse::Ok().json(PaginatedResponse {
        data: users,
        total,
        page,
        limit,
    }))
}

#[get("/{id}")]
async fn get_user(
    repo: web::Data<UserRepository>,
    caller: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    caller.require_owner_or(id, Capability::ManageUsers)?;
    Ok(HttpResponse::Ok().json(repo.find_by_id(id).await?))
}

#[put("/{id}")]
async fn update_user(
    repo: web::Data<UserRepository>,
    caller: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<UserUpdate>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let update = body.into_inner();
    caller.require_owner_or(id, Capability::ManageUsers)?;
    if update.touches_privileges() {
        caller.require(Capability::ManageUsers)?;
    }
    update.validate()?;

    let password_hash = match update.password.clone() {
        Some(password) => Some(web::block(move || hash_password(&password)).await??),
        None => None,
    };
    let user = repo.update(id, update, password_hash).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Refused with 409 while the user still has orders
#[delete("/{id}")]
async fn delete_user(
    repo: web::Data<UserRepository>,
    caller: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    caller.require(Capability::ManageUsers)?;
    repo.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_caps() {
        let query = PaginationQuery {
            page: Some("abc".into()),
            limit: Some("500".into()),
        };
        assert_eq!(query.resolve(100), (1, 100));

        let query = PaginationQuery {
            page: Some("3".into()),
            limit: None,
        };
        assert_eq!(query.resolve(100), (3, DEFAULT_PAGE_SIZE));
    }
}
