pub mod auth;
pub mod error_log;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use error_log::log_server_errors;
