//! # simshop-client
//!
//! Client-side storefront logic with no UI attached: the cart, the session
//! context, checkout and a typed HTTP client for every API endpoint.

pub mod api;
pub mod cart;
pub mod checkout;
pub mod error;
pub mod session;

pub use api::ApiClient;
pub use cart::{Cart, CartLine};
pub use checkout::{build_order, checkout, CheckoutForm};
pub use error::{ClientError, ClientResult};
pub use session::Session;
