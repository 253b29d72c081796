//! Admin dashboard.

use actix_web::{get, web, HttpResponse};

use simshop_core::{Capability, ShopConfig};

use crate::errors::ApiResult;
use crate::middleware::AuthenticatedUser;
use crate::repository::OrderRepository;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api/admin").service(stats));
}

#[get("/stats")]
async fn stats(
    orders: web::Data<OrderRepository>,
    config: web::Data<ShopConfig>,
    caller: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    caller.require(Capability::ViewStats)?;
    let stats = orders.dashboard(config.catalog.low_stock_threshold).await?;
    Ok(HttpResponse::Ok().json(stats))
}
