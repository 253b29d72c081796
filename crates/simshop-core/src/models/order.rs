//! Orders: a snapshot of purchased items, prices and shipping details plus the
//! two independent lifecycle fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{require_amount, require_text, ProductSummary, UserSummary};
use crate::errors::{ShopError, ShopResult};
use crate::status::{OrderStatus, PaymentStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl ShippingAddress {
    fn validate(&self) -> ShopResult<()> {
        require_text("shippingAddress.street", &self.street)?;
        require_text("shippingAddress.city", &self.city)?;
        require_text("shippingAddress.postalCode", &self.postal_code)?;
        require_text("shippingAddress.country", &self.country)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Tarjeta,
    Paypal,
    Transferencia,
    Contrareembolso,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tarjeta => "tarjeta",
            Self::Paypal => "paypal",
            Self::Transferencia => "transferencia",
            Self::Contrareembolso => "contrareembolso",
        }
    }

    pub fn parse(raw: &str) -> ShopResult<Self> {
        match raw {
            "tarjeta" => Ok(Self::Tarjeta),
            "paypal" => Ok(Self::Paypal),
            "transferencia" => Ok(Self::Transferencia),
            "contrareembolso" => Ok(Self::Contrareembolso),
            other => Err(ShopError::validation(format!(
                "unknown payment method '{other}'"
            ))),
        }
    }
}

/// One purchased line. `price` is the unit price at order time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product: Uuid,
    pub quantity: u32,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub user: Uuid,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub order_status: OrderStatus,
    pub payment_status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Whether stock was taken from the catalog when the order was placed.
    #[serde(default)]
    pub stock_reserved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Σ price × quantity over the item snapshots.
    pub fn items_total(&self) -> f64 {
        items_total(&self.items)
    }
}

pub fn items_total(items: &[OrderItem]) -> f64 {
    items
        .iter()
        .map(|item| item.price * f64::from(item.quantity))
        .sum()
}

pub type NewOrderItem = OrderItem;

/// Create order request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    /// Defaults to the authenticated caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Uuid>,
    pub items: Vec<NewOrderItem>,
    pub total_amount: f64,
    pub shipping_address: ShippingAddress,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewOrder {
    pub fn validate(&self) -> ShopResult<()> {
        if self.items.is_empty() {
            return Err(ShopError::validation("an order needs at least one item"));
        }
        for (index, item) in self.items.iter().enumerate() {
            if item.quantity == 0 {
                return Err(ShopError::validation(format!(
                    "items[{index}].quantity must be at least 1"
                )));
            }
            require_amount(&format!("items[{index}].price"), item.price)?;
        }
        require_amount("totalAmount", self.total_amount)?;
        self.shipping_address.validate()
    }

    /// Build the stored order for `user` with default statuses.
    pub fn into_order(self, user: Uuid, now: DateTime<Utc>) -> ShopResult<Order> {
        self.validate()?;
        Ok(Order {
            id: Uuid::new_v4(),
            user,
            items: self.items,
            total_amount: self.total_amount,
            shipping_address: self.shipping_address,
            payment_method: self.payment_method,
            order_status: OrderStatus::default(),
            payment_status: PaymentStatus::default(),
            notes: self.notes.filter(|n| !n.trim().is_empty()),
            stock_reserved: false,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Populated order item: the snapshot plus the live product, if it still exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemView {
    pub product_id: Uuid,
    pub product: Option<ProductSummary>,
    pub quantity: u32,
    pub price: f64,
}

/// Populated order returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user: Option<UserSummary>,
    pub items: Vec<OrderItemView>,
    pub total_amount: f64,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub order_status: OrderStatus,
    pub payment_status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderView {
    /// Join an order with whatever user/product summaries the lookups return.
    pub fn populate<U, P>(order: Order, user: U, mut product: P) -> Self
    where
        U: FnOnce(Uuid) -> Option<UserSummary>,
        P: FnMut(Uuid) -> Option<ProductSummary>,
    {
        let items = order
            .items
            .into_iter()
            .map(|item| OrderItemView {
                product_id: item.product,
                product: product(item.product),
                quantity: item.quantity,
                price: item.price,
            })
            .collect();

        Self {
            id: order.id,
            user_id: order.user,
            user: user(order.user),
            items,
            total_amount: order.total_amount,
            shipping_address: order.shipping_address,
            payment_method: order.payment_method,
            order_status: order.order_status,
            payment_status: order.payment_status,
            notes: order.notes,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> ShippingAddress {
        ShippingAddress {
            street: "Calle Mayor 1".into(),
            city: "Madrid".into(),
            postal_code: "28013".into(),
            country: "España".into(),
        }
    }

    #[test]
    fn new_order_defaults_to_pending() {
        let order = NewOrder {
            user: None,
            items: vec![OrderItem {
                product: Uuid::new_v4(),
                quantity: 1,
                price: 15.99,
            }],
            total_amount: 15.99,
            shipping_address: address(),
            payment_method: PaymentMethod::Tarjeta,
            notes: Some("   ".into()),
        }
        .into_order(Uuid::new_v4(), Utc::now())
        .unwrap();

        assert_eq!(order.order_status, OrderStatus::Pendiente);
        assert_eq!(order.payment_status, PaymentStatus::Pendiente);
        assert_eq!(order.notes, None);
    }

    #[test]
    fn empty_and_zero_quantity_orders_rejected() {
        let mut request = NewOrder {
            user: None,
            items: vec![],
            total_amount: 0.0,
            shipping_address: address(),
            payment_method: PaymentMethod::Paypal,
            notes: None,
        };
        assert!(request.validate().is_err());

        request.items.push(OrderItem {
            product: Uuid::new_v4(),
            quantity: 0,
            price: 1.0,
        });
        assert!(request.validate().is_err());
    }

    #[test]
    fn missing_address_field_rejected() {
        let mut shipping_address = address();
        shipping_address.city.clear();
        let request = NewOrder {
            user: None,
            items: vec![OrderItem {
                product: Uuid::new_v4(),
                quantity: 2,
                price: 1.0,
            }],
            total_amount: 2.0,
            shipping_address,
            payment_method: PaymentMethod::Paypal,
            notes: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn payment_method_uses_lowercase_names() {
        let json = serde_json::to_string(&PaymentMethod::Contrareembolso).unwrap();
        assert_eq!(json, "\"contrareembolso\"");
        assert!(PaymentMethod::parse("bitcoin").is_err());
    }
}
