//! Connection handle shared by every repository.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rusqlite::Connection;
use tracing::{debug, info};

use simshop_core::config::StorageConfig;
use simshop_core::{ShopError, ShopResult, StorageError};

use crate::{migrations, to_storage_err};

/// Owns the SQLite connection. Cheap to clone.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    /// Open (or create) the database described by `config` and migrate it.
    pub fn open(config: &StorageConfig) -> ShopResult<Self> {
        let conn = match &config.path {
            Some(path) => {
                info!(path = %path.display(), "opening database");
                Connection::open(path).map_err(to_storage_err)?
            }
            None => {
                info!("opening in-memory database");
                Connection::open_in_memory().map_err(to_storage_err)?
            }
        };
        apply_pragmas(&conn, config)?;
        migrations::run_migrations(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> ShopResult<Self> {
        Self::open(&StorageConfig::in_memory())
    }

    /// Run `f` against the connection on the blocking thread pool.
    pub async fn with_conn<F, T>(&self, f: F) -> ShopResult<T>
    where
        F: FnOnce(&Connection) -> ShopResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| poisoned())?;
            f(&*guard)
        })
        .await
        .map_err(|e| {
            ShopError::from(StorageError::Unavailable {
                reason: format!("storage task failed: {e}"),
            })
        })?
    }

    /// Run `f` on the calling thread. For startup code and tests.
    pub fn with_conn_sync<F, T>(&self, f: F) -> ShopResult<T>
    where
        F: FnOnce(&Connection) -> ShopResult<T>,
    {
        let guard = self.conn.lock().map_err(|_| poisoned())?;
        f(&*guard)
    }
}

fn poisoned() -> ShopError {
    StorageError::Unavailable {
        reason: "connection mutex poisoned".to_string(),
    }
    .into()
}

/// Connection pragmas: enforced foreign keys, WAL for file databases.
pub fn apply_pragmas(conn: &Connection, config: &StorageConfig) -> ShopResult<()> {
    conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))
        .map_err(to_storage_err)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(to_storage_err)?;
    if config.path.is_some() {
        // journal_mode returns a row, so it cannot go through execute_batch.
        let mode: String = conn
            .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
            .map_err(to_storage_err)?;
        debug!(journal_mode = %mode, "journal mode set");
    }
    Ok(())
}
