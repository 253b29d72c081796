//! Order placement and lifecycle configuration.

use serde::{Deserialize, Serialize};

use crate::policy::TotalPolicy;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderConfig {
    pub total_policy: TotalPolicy,
    /// Largest accepted difference between client and computed totals.
    pub total_tolerance: f64,
    /// Decrement product stock when an order is placed.
    pub reserve_stock: bool,
    /// Reject status changes the lifecycle does not allow.
    pub enforce_transitions: bool,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            total_policy: TotalPolicy::Trust,
            total_tolerance: 0.01,
            reserve_stock: false,
            enforce_transitions: false,
        }
    }
}
