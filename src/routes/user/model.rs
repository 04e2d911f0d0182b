use std::collections::BTreeSet;

use serde::Deserialize;

use crate::store::Role;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
    pub products: Option<BTreeSet<String>>,
}

/// 管理员更新用户，只合并提供的字段
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub role: Option<Role>,
    pub products: Option<BTreeSet<String>>,
}
