//! # simshop-storage
//!
//! SQLite persistence layer for SimShop.
//! Four collections (categories, products, users, orders); nested values are
//! stored as JSON documents inside their row.
//! A single connection guarded by a mutex, driven from the blocking pool.

pub mod migrations;
pub mod queries;
pub mod store;

pub use store::Store;

use rusqlite::ffi;
use simshop_core::{ShopError, StorageError};

/// Convert a rusqlite error into a `ShopError`, classifying constraint failures.
pub fn to_storage_err(err: rusqlite::Error) -> ShopError {
    if let rusqlite::Error::SqliteFailure(failure, message) = &err {
        let message = message.clone().unwrap_or_else(|| failure.to_string());
        match failure.extended_code {
            ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                let field = message
                    .rsplit(": ")
                    .next()
                    .unwrap_or("value")
                    .to_string();
                return StorageError::Duplicate { field }.into();
            }
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                return StorageError::Reference { message }.into();
            }
            ffi::SQLITE_CONSTRAINT_CHECK => {
                return ShopError::Validation(message);
            }
            _ => {}
        }
    }
    StorageError::Sqlite {
        message: err.to_string(),
    }
    .into()
}
