use serde::{Deserialize, Serialize};

use crate::store::User;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// 会话ID，后续请求作为Bearer令牌携带
    pub token: String,
    pub user: User,
}
