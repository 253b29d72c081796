//! Auth HTTP handlers: registration, login and the current user.

use actix_web::{get, post, web, HttpResponse};
use tracing::{info, warn};

use simshop_core::models::{AuthResponse, LoginRequest, RegisterRequest, Role};
use simshop_core::ShopError;

use crate::errors::ApiResult;
use crate::middleware::AuthenticatedUser;
use crate::repository::UserRepository;
use crate::security::{hash_password, verify_password, TokenService};

/// Configure auth routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .service(register)
            .service(login)
            .service(me),
    );
}

/// New customer account. The role is never taken from the request.
#[post("/register")]
async fn register(
    users: web::Data<UserRepository>,
    tokens: web::Data<TokenService>,
    body: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let request = body.into_inner();
    request.validate()?;

    let password = request.password.clone();
    let hash = web::block(move || hash_password(&password)).await??;
    let user = users
        .create(&request.name, &request.email, Role::Customer, hash)
        .await?;
    let token = tokens.issue(&user)?;

    Ok(HttpResponse::Created().json(AuthResponse { token, user }))
}

#[post("/login")]
async fn login(
    users: web::Data<UserRepository>,
    tokens: web::Data<TokenService>,
    body: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let request = body.into_inner();
    let Some((user, hash)) = users.credentials(&request.email).await? else {
        warn!("login with unknown email");
        return Err(ShopError::Unauthenticated.into());
    };

    let password = request.password;
    let valid = web::block(move || verify_password(&password, &hash)).await??;
    if !valid {
        warn!(id = %user.id, "login with wrong password");
        return Err(ShopError::Unauthenticated.into());
    }
    if !user.active {
        return Err(ShopError::Forbidden("account is deactivated".to_string()).into());
    }

    let token = tokens.issue(&user)?;
    info!(id = %user.id, "user logged in");
    Ok(HttpResponse::Ok().json(AuthResponse { token, user }))
}

/// The authenticated user
#[get("/me")]
async fn me(
    users: web::Data<UserRepository>,
    caller: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    let user = users
        .find_by_id(caller.user_id)
        .await
        .map_err(|err| match err {
            ShopError::NotFound { .. } => ShopError::Unauthenticated,
            other => other,
        })?;
    Ok(HttpResponse::Ok().json(user))
}
