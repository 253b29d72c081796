//! # simshop-server
//!
//! REST API for the SimShop storefront on actix-web.
//! Repositories wrap the SQLite store; handlers check capabilities at the
//! boundary and map domain errors to HTTP statuses.

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod repository;
pub mod security;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpResponse};
use tracing::info;

use simshop_core::config::BootstrapAdmin;
use simshop_core::models::{RegisterRequest, Role};
use simshop_core::{ShopConfig, ShopResult};
use simshop_storage::Store;

use crate::errors::{ApiError, ApiResult};
use crate::middleware::{AuthMiddleware, LoggingMiddleware};
use crate::repository::{CatalogRepository, OrderRepository, UserRepository};
use crate::security::{hash_password, TokenService};

/// Shared application state. Each field is registered as its own app data.
#[derive(Clone)]
pub struct AppState {
    pub catalog: web::Data<CatalogRepository>,
    pub users: web::Data<UserRepository>,
    pub orders: web::Data<OrderRepository>,
    pub tokens: web::Data<TokenService>,
    pub config: web::Data<ShopConfig>,
}

impl AppState {
    /// Open the configured store and build the repositories on top of it.
    pub fn new(config: ShopConfig) -> ShopResult<Self> {
        let store = Store::open(&config.storage)?;
        Ok(Self::with_store(store, config))
    }

    pub fn with_store(store: Store, config: ShopConfig) -> Self {
        Self {
            catalog: web::Data::new(CatalogRepository::new(store.clone())),
            users: web::Data::new(UserRepository::new(store.clone())),
            orders: web::Data::new(OrderRepository::new(store, config.orders.clone())),
            tokens: web::Data::new(TokenService::new(&config.auth)),
            config: web::Data::new(config),
        }
    }
}

/// Create the configured admin account unless that email is already taken.
/// Returns whether an account was created.
pub async fn provision_admin(users: &UserRepository, admin: &BootstrapAdmin) -> ShopResult<bool> {
    if users.exists_by_email(&admin.email).await? {
        return Ok(false);
    }
    RegisterRequest {
        name: admin.name.clone(),
        email: admin.email.clone(),
        password: admin.password.clone(),
    }
    .validate()?;

    let hash = hash_password(&admin.password)?;
    let user = users
        .create(&admin.name, &admin.email, Role::Admin, hash)
        .await?;
    info!(id = %user.id, email = %user.email, "bootstrap admin created");
    Ok(true)
}

async fn route_not_found() -> ApiResult<HttpResponse> {
    Err(ApiError::NotFound("route".to_string()))
}

/// Build the application: app data, extractor error handlers, routes and
/// middleware.
pub fn build_app(
    state: AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let tokens = state.tokens.get_ref().clone();

    App::new()
        .app_data(state.catalog)
        .app_data(state.users)
        .app_data(state.orders)
        .app_data(state.tokens)
        .app_data(state.config)
        .app_data(
            web::JsonConfig::default()
                .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
        )
        .app_data(
            web::PathConfig::default()
                .error_handler(|err, _req| ApiError::NotFound(err.to_string()).into()),
        )
        .app_data(
            web::QueryConfig::default()
                .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
        )
        .configure(handlers::configure)
        .default_service(web::route().to(route_not_found))
        .wrap(AuthMiddleware::new(tokens))
        .wrap(LoggingMiddleware)
}
