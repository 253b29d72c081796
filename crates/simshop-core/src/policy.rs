//! Order placement policies: how far the server trusts the client.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::OrderConfig;
use crate::errors::{ShopError, ShopResult};
use crate::models::order::{items_total, NewOrder};

/// What to do with the client-supplied `totalAmount`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TotalPolicy {
    /// Store the client total verbatim.
    #[default]
    Trust,
    /// Reject totals that differ from Σ price × quantity.
    Verify,
}

/// Check the client total against the item snapshots according to `config`.
pub fn check_total(order: &NewOrder, config: &OrderConfig) -> ShopResult<()> {
    let computed = items_total(&order.items);
    let difference = (computed - order.total_amount).abs();
    if difference <= config.total_tolerance {
        return Ok(());
    }

    match config.total_policy {
        TotalPolicy::Trust => {
            warn!(
                client_total = order.total_amount,
                computed_total = computed,
                "order total differs from item prices, storing client value"
            );
            Ok(())
        }
        TotalPolicy::Verify => Err(ShopError::validation(format!(
            "totalAmount {:.2} does not match item total {:.2}",
            order.total_amount, computed
        ))),
    }
}
