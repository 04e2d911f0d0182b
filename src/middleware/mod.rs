mod auth;
mod error_handler;

pub use auth::{CurrentUser, auth_middleware, ensure_admin, require_admin};
pub use error_handler::log_errors;
