pub mod auth_config;
pub mod catalog_config;
pub mod observability_config;
pub mod order_config;
pub mod server_config;
pub mod storage_config;

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub use auth_config::{AuthConfig, BootstrapAdmin, DEFAULT_JWT_SECRET};
pub use catalog_config::CatalogConfig;
pub use observability_config::ObservabilityConfig;
pub use order_config::OrderConfig;
pub use server_config::ServerConfig;
pub use storage_config::StorageConfig;

use crate::errors::{ShopError, ShopResult};

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ShopConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub orders: OrderConfig,
    pub catalog: CatalogConfig,
    pub observability: ObservabilityConfig,
}

/// Value of `SIMSHOP_DB_PATH` that selects an in-memory database.
pub const IN_MEMORY_DB: &str = ":memory:";

impl ShopConfig {
    /// Load config from a TOML string, falling back to defaults for missing fields.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Read the optional TOML file, then apply `SIMSHOP_*` environment overrides.
    pub fn load(path: Option<&Path>) -> ShopResult<Self> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    ShopError::Config(format!("cannot read {}: {e}", path.display()))
                })?;
                Self::from_toml(&raw)
                    .map_err(|e| ShopError::Config(format!("{}: {e}", path.display())))?
            }
            None => {
                info!("no config file given, using defaults");
                Self::default()
            }
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from `lookup`, which maps variable names to values.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ShopResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SIMSHOP_HOST") {
            self.server.host = host;
        }
        if let Some(port) = parse_var(&lookup, "SIMSHOP_PORT")? {
            self.server.port = port;
        }
        if let Some(path) = lookup("SIMSHOP_DB_PATH") {
            self.storage.path = if path == IN_MEMORY_DB {
                None
            } else {
                Some(PathBuf::from(path))
            };
        }
        if let Some(secret) = lookup("SIMSHOP_JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(filter) = lookup("SIMSHOP_LOG") {
            self.observability.log_filter = filter;
        }

        if self.auth.jwt_secret == DEFAULT_JWT_SECRET {
            warn!("using the built-in development JWT secret; set SIMSHOP_JWT_SECRET in production");
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> ShopResult<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| ShopError::Config(format!("invalid {key} value '{raw}': {e}")))
        })
        .transpose()
}
