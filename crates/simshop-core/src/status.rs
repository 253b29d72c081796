//! Order lifecycle: fulfilment status and payment status.
//!
//! The two dimensions are independent. Each one is a small state machine:
//!
//! ```text
//! orderStatus:   pendiente -> procesando -> enviado -> entregado
//!                     \____________\___________\------> cancelado
//! paymentStatus: pendiente -> pagado | fallido
//! ```
//!
//! Whether the machine is enforced is decided by `OrderConfig::enforce_transitions`;
//! with enforcement off any value may overwrite any other.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ShopError, ShopResult};

/// Fulfilment state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pendiente,
    Procesando,
    Enviado,
    Entregado,
    Cancelado,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        Self::Pendiente,
        Self::Procesando,
        Self::Enviado,
        Self::Entregado,
        Self::Cancelado,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pendiente => "pendiente",
            Self::Procesando => "procesando",
            Self::Enviado => "enviado",
            Self::Entregado => "entregado",
            Self::Cancelado => "cancelado",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Entregado | Self::Cancelado)
    }

    /// Forward-only transitions; cancellation from any non-terminal state.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        if self == next {
            return true;
        }
        match (self, next) {
            (from, Self::Cancelado) => !from.is_terminal(),
            (Self::Pendiente, Self::Procesando)
            | (Self::Procesando, Self::Enviado)
            | (Self::Enviado, Self::Entregado) => true,
            _ => false,
        }
    }
}

/// Payment state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pendiente,
    Pagado,
    Fallido,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 3] = [Self::Pendiente, Self::Pagado, Self::Fallido];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pendiente => "pendiente",
            Self::Pagado => "pagado",
            Self::Fallido => "fallido",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pendiente)
    }

    pub fn can_transition_to(self, next: PaymentStatus) -> bool {
        self == next || self == Self::Pendiente
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ShopError::validation(format!("unknown order status '{s}'")))
    }
}

impl FromStr for PaymentStatus {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ShopError::validation(format!("unknown payment status '{s}'")))
    }
}

/// Requested change to an order's statuses. Absent fields keep their value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_status: Option<OrderStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
}

/// Resolve the statuses an order ends up with after `update`.
///
/// With `enforce` off this is a plain overwrite.
pub fn resolve_status_update(
    current: (OrderStatus, PaymentStatus),
    update: StatusUpdate,
    enforce: bool,
) -> ShopResult<(OrderStatus, PaymentStatus)> {
    let (order_now, payment_now) = current;
    let order_next = update.order_status.unwrap_or(order_now);
    let payment_next = update.payment_status.unwrap_or(payment_now);

    if enforce {
        if !order_now.can_transition_to(order_next) {
            return Err(ShopError::InvalidTransition {
                field: "orderStatus",
                from: order_now.to_string(),
                to: order_next.to_string(),
            });
        }
        if !payment_now.can_transition_to(payment_next) {
            return Err(ShopError::InvalidTransition {
                field: "paymentStatus",
                from: payment_now.to_string(),
                to: payment_next.to_string(),
            });
        }
    }

    Ok((order_next, payment_next))
}
