//! Repository module
//!
//! Async data access over the shared `Store`. Each call runs its queries
//! under one connection lock on the blocking pool.

pub mod catalog_repository;
pub mod order_repository;
pub mod user_repository;

pub use catalog_repository::CatalogRepository;
pub use order_repository::OrderRepository;
pub use user_repository::UserRepository;
