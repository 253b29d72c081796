//! Order repository: placement, lookups, status changes and the dashboard.
//!
//! Read paths return populated views. Summaries for users and products are
//! fetched once per distinct id and joined in memory.

use std::collections::HashMap;

use rusqlite::Connection;
use tracing::info;
use uuid::Uuid;

use simshop_core::config::OrderConfig;
use simshop_core::models::{now, NewOrder, Order, OrderView, ProductFilter, ProductSummary, UserSummary};
use simshop_core::policy::check_total;
use simshop_core::stats::DashboardStats;
use simshop_core::status::{resolve_status_update, StatusUpdate};
use simshop_core::{ShopError, ShopResult};
use simshop_storage::queries::{orders, products, users};
use simshop_storage::Store;

/// Orders shown in the dashboard's recent list.
pub const RECENT_ORDERS: u32 = 5;

#[derive(Clone)]
pub struct OrderRepository {
    store: Store,
    config: OrderConfig,
}

fn populate_all(conn: &Connection, batch: Vec<Order>) -> ShopResult<Vec<OrderView>> {
    let mut user_cache: HashMap<Uuid, Option<UserSummary>> = HashMap::new();
    let mut product_cache: HashMap<Uuid, Option<ProductSummary>> = HashMap::new();

    for order in &batch {
        if !user_cache.contains_key(&order.user) {
            let summary = users::get_user(conn, order.user)?.map(|u| u.summary());
            user_cache.insert(order.user, summary);
        }
        for item in &order.items {
            if !product_cache.contains_key(&item.product) {
                let summary = products::get_product(conn, item.product)?.map(|p| p.summary());
                product_cache.insert(item.product, summary);
            }
        }
    }

    Ok(batch
        .into_iter()
        .map(|order| {
            OrderView::populate(
                order,
                |id| user_cache.get(&id).cloned().flatten(),
                |id| product_cache.get(&id).cloned().flatten(),
            )
        })
        .collect())
}

fn populate(conn: &Connection, order: Order) -> ShopResult<OrderView> {
    let id = order.id;
    populate_all(conn, vec![order])?
        .pop()
        .ok_or_else(|| ShopError::not_found("order", id))
}

impl OrderRepository {
    pub fn new(store: Store, config: OrderConfig) -> Self {
        Self { store, config }
    }

    /// Validate and store a new order for `user`.
    ///
    /// The referenced user and products must exist. With stock reservation
    /// enabled the quantities are taken from the catalog atomically.
    pub async fn create(&self, request: NewOrder, user: Uuid) -> ShopResult<OrderView> {
        request.validate()?;
        check_total(&request, &self.config)?;
        let reserve = self.config.reserve_stock;
        let mut order = request.into_order(user, now())?;

        let view = self
            .store
            .with_conn(move |conn| {
                if users::get_user(conn, order.user)?.is_none() {
                    return Err(ShopError::validation(format!(
                        "user {} does not exist",
                        order.user
                    )));
                }
                for item in &order.items {
                    if products::get_product(conn, item.product)?.is_none() {
                        return Err(ShopError::validation(format!(
                            "product {} does not exist",
                            item.product
                        )));
                    }
                }
                if reserve {
                    orders::insert_order_reserving_stock(conn, &mut order)?;
                } else {
                    orders::insert_order(conn, &order)?;
                }
                populate(conn, order)
            })
            .await?;

        info!(
            id = %view.id,
            user = %view.user_id,
            items = view.items.len(),
            total = view.total_amount,
            "order created"
        );
        Ok(view)
    }

    pub async fn get(&self, id: Uuid) -> ShopResult<OrderView> {
        self.store
            .with_conn(move |conn| {
                let order =
                    orders::get_order(conn, id)?.ok_or_else(|| ShopError::not_found("order", id))?;
                populate(conn, order)
            })
            .await
    }

    pub async fn list_for_user(&self, user: Uuid) -> ShopResult<Vec<OrderView>> {
        self.store
            .with_conn(move |conn| populate_all(conn, orders::list_orders_for_user(conn, user)?))
            .await
    }

    pub async fn list_all(&self) -> ShopResult<Vec<OrderView>> {
        self.store
            .with_conn(|conn| populate_all(conn, orders::list_orders(conn)?))
            .await
    }

    /// Apply a status change. Missing fields keep their value; legality is
    /// checked only when transitions are enforced.
    pub async fn update_status(&self, id: Uuid, update: StatusUpdate) -> ShopResult<OrderView> {
        let enforce = self.config.enforce_transitions;
        let view = self
            .store
            .with_conn(move |conn| {
                let mut order =
                    orders::get_order(conn, id)?.ok_or_else(|| ShopError::not_found("order", id))?;
                let (order_status, payment_status) = resolve_status_update(
                    (order.order_status, order.payment_status),
                    update,
                    enforce,
                )?;
                order.order_status = order_status;
                order.payment_status = payment_status;
                order.updated_at = now();
                if !orders::save_status(conn, &mut order)? {
                    return Err(ShopError::not_found("order", id));
                }
                populate(conn, order)
            })
            .await?;

        info!(
            id = %view.id,
            order_status = %view.order_status,
            payment_status = %view.payment_status,
            "order status updated"
        );
        Ok(view)
    }

    pub async fn dashboard(&self, low_stock_threshold: i64) -> ShopResult<DashboardStats> {
        self.store
            .with_conn(move |conn| {
                let catalog = products::list_products(conn, &ProductFilter::default())?;
                let all_orders = orders::list_orders(conn)?;
                let total_users = users::count_users(conn)?;
                let mut stats = DashboardStats::compute(
                    &catalog,
                    &all_orders,
                    usize::try_from(total_users).unwrap_or_default(),
                    low_stock_threshold,
                );
                let recent = all_orders
                    .into_iter()
                    .take(RECENT_ORDERS as usize)
                    .collect();
                stats.recent_orders = populate_all(conn, recent)?;
                Ok(stats)
            })
            .await
    }
}
