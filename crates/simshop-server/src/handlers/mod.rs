//! HTTP handlers, one module per resource.

pub mod admin_handlers;
pub mod auth_handlers;
pub mod category_handlers;
pub mod order_handlers;
pub mod product_handlers;
pub mod user_handlers;

use actix_web::{get, web, HttpResponse};
use serde_json::json;

pub const BANNER: &str = "API Ecommerce SIM - Funcionando correctamente";

/// Health banner.
#[get("/")]
async fn index() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": BANNER }))
}

/// Register every route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .configure(category_handlers::configure)
        .configure(product_handlers::configure)
        .configure(auth_handlers::configure)
        .configure(order_handlers::configure)
        .configure(user_handlers::configure)
        .configure(admin_handlers::configure);
}
