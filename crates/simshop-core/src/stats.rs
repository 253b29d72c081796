//! Admin dashboard figures.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{Order, OrderView, Product};
use crate::status::{OrderStatus, PaymentStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_products: usize,
    pub total_orders: usize,
    pub total_users: usize,
    /// Σ totalAmount over paid orders.
    pub total_revenue: f64,
    /// Products with stock below the configured threshold.
    pub low_stock: usize,
    pub pending_orders: usize,
    pub orders_by_status: BTreeMap<String, usize>,
    pub recent_orders: Vec<OrderView>,
}

impl DashboardStats {
    /// `recent_orders` is left empty; callers populate it.
    pub fn compute(
        products: &[Product],
        orders: &[Order],
        total_users: usize,
        low_stock_threshold: i64,
    ) -> Self {
        let mut orders_by_status: BTreeMap<String, usize> = OrderStatus::ALL
            .iter()
            .map(|status| (status.as_str().to_string(), 0))
            .collect();
        for order in orders {
            *orders_by_status
                .entry(order.order_status.as_str().to_string())
                .or_default() += 1;
        }

        Self {
            total_products: products.len(),
            total_orders: orders.len(),
            total_users,
            total_revenue: orders
                .iter()
                .filter(|o| o.payment_status == PaymentStatus::Pagado)
                .map(|o| o.total_amount)
                .sum(),
            low_stock: products
                .iter()
                .filter(|p| p.stock < low_stock_threshold)
                .count(),
            pending_orders: orders
                .iter()
                .filter(|o| o.order_status == OrderStatus::Pendiente)
                .count(),
            orders_by_status,
            recent_orders: Vec::new(),
        }
    }
}
