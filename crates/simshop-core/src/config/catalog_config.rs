//! Catalog listing configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub max_page_size: u32,
    /// Stock level under which a product counts as low on the dashboard.
    pub low_stock_threshold: i64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            max_page_size: 100,
            low_stock_threshold: 10,
        }
    }
}
