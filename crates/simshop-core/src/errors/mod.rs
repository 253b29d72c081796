mod shop_error;
mod storage_error;

pub use shop_error::{ShopError, ShopResult};
pub use storage_error::StorageError;
