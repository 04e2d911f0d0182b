mod handler;
mod model;

pub use handler::{login, logout, me, register};
pub(crate) use handler::validate_account_fields;
pub use model::{LoginRequest, LoginResponse, RegisterRequest};
