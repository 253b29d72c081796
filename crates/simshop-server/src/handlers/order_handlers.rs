//! Order HTTP handlers

use actix_web::{get, post, put, web, HttpResponse};
use uuid::Uuid;

use simshop_core::models::NewOrder;
use simshop_core::status::StatusUpdate;
use simshop_core::{Capability, ShopError};

use crate::errors::ApiResult;
use crate::middleware::AuthenticatedUser;
use crate::repository::OrderRepository;

/// Configure order routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/orders")
            .service(create_order)
            .service(list_orders)
            .service(list_user_orders)
            .service(get_order)
            .service(update_status),
    );
}

/// Place an order. `user` defaults to the caller; only admins may order on
/// behalf of someone else.
#[post("")]
async fn create_order(
    repo: web::Data<OrderRepository>,
    caller: AuthenticatedUser,
    body: web::Json<NewOrder>,
) -> ApiResult<HttpResponse> {
    let request = body.into_inner();
    let owner = request.user.unwrap_or(caller.user_id);
    caller.require_owner_or(owner, Capability::ManageOrders)?;

    let order = repo.create(request, owner).await?;
    Ok(HttpResponse::Created().json(order))
}

/// Every order, newest first
#[get("")]
async fn list_orders(
    repo: web::Data<OrderRepository>,
    caller: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    caller.require(Capability::ManageOrders)?;
    Ok(HttpResponse::Ok().json(repo.list_all().await?))
}

#[get("/user/{user_id}")]
async fn list_user_orders(
    repo: web::Data<OrderRepository>,
    caller: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let user_id = path.into_inner();
    caller.require_owner_or(user_id, Capability::ManageOrders)?;
    Ok(HttpResponse::Ok().json(repo.list_for_user(user_id).await?))
}

#[get("/{id}")]
async fn get_order(
    repo: web::Data<OrderRepository>,
    caller: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let order = repo.get(id).await?;
    // Someone else's order looks the same as a missing one.
    caller
        .require_owner_or(order.user_id, Capability::ManageOrders)
        .map_err(|_| ShopError::not_found("order", id))?;
    Ok(HttpResponse::Ok().json(order))
}

#[put("/{id}/status")]
async fn update_status(
    repo: web::Data<OrderRepository>,
    caller: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<StatusUpdate>,
) -> ApiResult<HttpResponse> {
    caller.require(Capability::ManageOrders)?;
    let order = repo
        .update_status(path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(order))
}
