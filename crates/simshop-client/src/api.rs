//! Typed async client for the SimShop REST API.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use simshop_core::models::{
    AuthResponse, Category, CategoryUpdate, LoginRequest, NewCategory, NewOrder, NewProduct,
    OrderView, PaginatedResponse, Product, ProductQuery, ProductUpdate, RegisterRequest, User,
    UserUpdate,
};
use simshop_core::stats::DashboardStats;
use simshop_core::status::StatusUpdate;

use crate::error::{ClientError, ClientResult, ErrorBody};
use crate::session::Session;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct Banner {
    message: String,
}

#[derive(Debug, Serialize)]
struct PageParams {
    page: u32,
    limit: u32,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Client for the API rooted at `base_url`, e.g. `http://localhost:5000`.
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let base_url = base_url.into();
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidBaseUrl(base_url));
        }
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn send_empty(&self, request: RequestBuilder) -> ClientResult<()> {
        check(request.send().await?).await?;
        Ok(())
    }

    // ── Public ───────────────────────────────────────────────────────────────

    /// The service banner.
    pub async fn health(&self) -> ClientResult<String> {
        let banner: Banner = self.send(self.http.get(self.url("/"))).await?;
        Ok(banner.message)
    }

    pub async fn categories(&self) -> ClientResult<Vec<Category>> {
        self.send(self.http.get(self.url("/api/categories"))).await
    }

    pub async fn category(&self, slug: &str) -> ClientResult<Category> {
        self.send(self.http.get(self.url(&format!("/api/categories/{slug}"))))
            .await
    }

    pub async fn products(&self, query: &ProductQuery) -> ClientResult<Vec<Product>> {
        self.send(
            self.http
                .get(self.url("/api/products"))
                .query(&query.to_pairs()),
        )
        .await
    }

    pub async fn product(&self, slug: &str) -> ClientResult<Product> {
        self.send(self.http.get(self.url(&format!("/api/products/{slug}"))))
            .await
    }

    // ── Auth ─────────────────────────────────────────────────────────────────

    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<Session> {
        let auth: AuthResponse = self
            .send(self.http.post(self.url("/api/auth/register")).json(request))
            .await?;
        debug!(id = %auth.user.id, "registered");
        Ok(auth.into())
    }

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Session> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let auth: AuthResponse = self
            .send(self.http.post(self.url("/api/auth/login")).json(&request))
            .await?;
        debug!(id = %auth.user.id, "logged in");
        Ok(auth.into())
    }

    pub async fn me(&self, session: &Session) -> ClientResult<User> {
        self.send(
            self.http
                .get(self.url("/api/auth/me"))
                .bearer_auth(&session.token),
        )
        .await
    }

    // ── Catalog administration ───────────────────────────────────────────────

    pub async fn create_category(
        &self,
        session: &Session,
        category: &NewCategory,
    ) -> ClientResult<Category> {
        self.send(
            self.http
                .post(self.url("/api/categories"))
                .bearer_auth(&session.token)
                .json(category),
        )
        .await
    }

    pub async fn update_category(
        &self,
        session: &Session,
        id: Uuid,
        update: &CategoryUpdate,
    ) -> ClientResult<Category> {
        self.send(
            self.http
                .put(self.url(&format!("/api/categories/{id}")))
                .bearer_auth(&session.token)
                .json(update),
        )
        .await
    }

    pub async fn delete_category(&self, session: &Session, id: Uuid) -> ClientResult<()> {
        self.send_empty(
            self.http
                .delete(self.url(&format!("/api/categories/{id}")))
                .bearer_auth(&session.token),
        )
        .await
    }

    pub async fn create_product(
        &self,
        session: &Session,
        product: &NewProduct,
    ) -> ClientResult<Product> {
        self.send(
            self.http
                .post(self.url("/api/products"))
                .bearer_auth(&session.token)
                .json(product),
        )
        .await
    }

    pub async fn update_product(
        &self,
        session: &Session,
        id: Uuid,
        update: &ProductUpdate,
    ) -> ClientResult<Product> {
        self.send(
            self.http
                .put(self.url(&format!("/api/products/{id}")))
                .bearer_auth(&session.token)
                .json(update),
        )
        .await
    }

    pub async fn delete_product(&self, session: &Session, id: Uuid) -> ClientResult<()> {
        self.send_empty(
            self.http
                .delete(self.url(&format!("/api/products/{id}")))
                .bearer_auth(&session.token),
        )
        .await
    }

    // ── Orders ───────────────────────────────────────────────────────────────

    pub async fn create_order(&self, session: &Session, order: &NewOrder) -> ClientResult<OrderView> {
        self.send(
            self.http
                .post(self.url("/api/orders"))
                .bearer_auth(&session.token)
                .json(order),
        )
        .await
    }

    /// Every order. Admin only.
    pub async fn orders(&self, session: &Session) -> ClientResult<Vec<OrderView>> {
        self.send(
            self.http
                .get(self.url("/api/orders"))
                .bearer_auth(&session.token),
        )
        .await
    }

    pub async fn user_orders(&self, session: &Session, user: Uuid) -> ClientResult<Vec<OrderView>> {
        self.send(
            self.http
                .get(self.url(&format!("/api/orders/user/{user}")))
                .bearer_auth(&session.token),
        )
        .await
    }

    pub async fn order(&self, session: &Session, id: Uuid) -> ClientResult<OrderView> {
        self.send(
            self.http
                .get(self.url(&format!("/api/orders/{id}")))
                .bearer_auth(&session.token),
        )
        .await
    }

    pub async fn update_order_status(
        &self,
        session: &Session,
        id: Uuid,
        update: StatusUpdate,
    ) -> ClientResult<OrderView> {
        self.send(
            self.http
                .put(self.url(&format!("/api/orders/{id}/status")))
                .bearer_auth(&session.token)
                .json(&update),
        )
        .await
    }

    // ── Users ────────────────────────────────────────────────────────────────

    pub async fn users(
        &self,
        session: &Session,
        page: u32,
        limit: u32,
    ) -> ClientResult<PaginatedResponse<User>> {
        self.send(
            self.http
                .get(self.url("/api/users"))
                .bearer_auth(&session.token)
                .query(&PageParams { page, limit }),
        )
        .await
    }

    pub async fn user(&self, session: &Session, id: Uuid) -> ClientResult<User> {
        self.send(
            self.http
                .get(self.url(&format!("/api/users/{id}")))
                .bearer_auth(&session.token),
        )
        .await
    }

    pub async fn update_user(
        &self,
        session: &Session,
        id: Uuid,
        update: &UserUpdate,
    ) -> ClientResult<User> {
        self.send(
            self.http
                .put(self.url(&format!("/api/users/{id}")))
                .bearer_auth(&session.token)
                .json(update),
        )
        .await
    }

    pub async fn delete_user(&self, session: &Session, id: Uuid) -> ClientResult<()> {
        self.send_empty(
            self.http
                .delete(self.url(&format!("/api/users/{id}")))
                .bearer_auth(&session.token),
        )
        .await
    }

    // ── Admin ────────────────────────────────────────────────────────────────

    pub async fn stats(&self, session: &Session) -> ClientResult<DashboardStats> {
        self.send(
            self.http
                .get(self.url("/api/admin/stats"))
                .bearer_auth(&session.token),
        )
        .await
    }
}

/// Turn non-success responses into `ClientError::Api`.
async fn check(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let (code, message) = match response.json::<ErrorBody>().await {
        Ok(body) => (body.code, body.error),
        Err(_) => (
            "UNKNOWN".to_string(),
            status.canonical_reason().unwrap_or("unknown error").to_string(),
        ),
    };
    warn!(status = status.as_u16(), url = %url, code = %code, "API request failed");
    Err(ClientError::Api {
        status: status.as_u16(),
        code,
        message,
    })
}
