//! # simshop-core
//!
//! Foundation crate for the SimShop storefront.
//! Defines the catalog, user and order types, the order status state machine,
//! order policies, authorization capabilities, dashboard statistics,
//! configuration, errors and tracing bootstrap.
//! Every other crate in the workspace depends on this.

pub mod access;
pub mod config;
pub mod errors;
pub mod models;
pub mod policy;
pub mod stats;
pub mod status;
pub mod telemetry;

// Re-export the most commonly used types at the crate root.
pub use access::{Capability, Principal};
pub use config::ShopConfig;
pub use errors::{ShopError, ShopResult, StorageError};
pub use status::{OrderStatus, PaymentStatus};
