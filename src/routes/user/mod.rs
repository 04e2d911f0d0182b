mod handler;
mod model;

pub use handler::{create_user, delete_user, list_users, update_user};
pub use model::{CreateUserRequest, UpdateUserRequest};
