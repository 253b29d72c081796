//! Request middleware: bearer-token authentication and request logging.

pub mod auth;
pub mod logging;

pub use auth::{AuthMiddleware, AuthenticatedUser};
pub use logging::{LoggingMiddleware, RequestId};
