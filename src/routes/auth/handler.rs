use std::collections::BTreeSet;

use axum::{
    Extension,
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    AppState,
    middleware::CurrentUser,
    store::{NewUser, Role, StoreError},
    utils::{
        error_codes, error_to_api_response, hash_password, success_to_api_response,
        verify_password,
    },
};

use super::model::{LoginRequest, LoginResponse, RegisterRequest};

/// 校验注册/创建用户的公共字段，返回第一个不合法字段的提示
pub(crate) fn validate_account_fields(email: &str, password: &str, name: &str) -> Option<String> {
    if email.is_empty() || !email.contains('@') {
        return Some("email 格式无效".to_string());
    }
    if password.len() < 6 || password.len() > 64 {
        return Some("password 长度必须在6到64个字符之间".to_string());
    }
    if name.trim().is_empty() {
        return Some("name 不能为空".to_string());
    }
    None
}

/// 自助注册，角色固定为操作员且不分配产品
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> impl IntoResponse {
    if let Some(msg) = validate_account_fields(&req.email, &req.password, &req.name) {
        return (
            StatusCode::BAD_REQUEST,
            error_to_api_response(error_codes::VALIDATION_ERROR, msg),
        );
    }

    let password_hash = match hash_password(&req.password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Failed to hash password: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response(error_codes::INTERNAL_ERROR, "创建用户失败".to_string()),
            );
        }
    };

    match state.stores.users.create(NewUser {
        email: req.email,
        password_hash,
        name: req.name,
        role: Role::Operator,
        products: BTreeSet::new(),
    }) {
        Ok(user) => {
            tracing::info!("Registered operator: {}", user.email);
            (StatusCode::CREATED, success_to_api_response(user))
        }
        Err(StoreError::DuplicateEmail(_)) => (
            StatusCode::BAD_REQUEST,
            error_to_api_response(error_codes::EMAIL_EXISTS, "邮箱已被注册".to_string()),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_to_api_response(error_codes::INTERNAL_ERROR, e.to_string()),
        ),
    }
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    // 未知邮箱和密码错误返回同样的提示
    let user = match state.stores.users.get_by_email(&req.email) {
        Some(user) => user,
        None => {
            return (
                StatusCode::UNAUTHORIZED,
                error_to_api_response(error_codes::AUTH_FAILED, "邮箱或密码错误".to_string()),
            );
        }
    };

    match verify_password(&req.password, &user.password_hash) {
        Ok(true) => (),
        Ok(false) => {
            return (
                StatusCode::UNAUTHORIZED,
                error_to_api_response(error_codes::AUTH_FAILED, "邮箱或密码错误".to_string()),
            );
        }
        Err(e) => {
            tracing::error!("Password verification failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response(error_codes::INTERNAL_ERROR, "登录失败".to_string()),
            );
        }
    }

    match state.sessions.create(&user.id).await {
        Ok(session) => (
            StatusCode::OK,
            success_to_api_response(LoginResponse {
                token: session.session_id,
                user,
            }),
        ),
        Err(e) => {
            tracing::error!("Failed to create session: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response(error_codes::INTERNAL_ERROR, "创建会话失败".to_string()),
            )
        }
    }
}

/// 登出即销毁会话
#[axum::debug_handler]
pub async fn logout(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match state.sessions.destroy(&current.session_id).await {
        Ok(()) => (
            StatusCode::OK,
            success_to_api_response(serde_json::json!({
                "success": true
            })),
        ),
        Err(e) => {
            tracing::error!("Failed to destroy session: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response(error_codes::INTERNAL_ERROR, "登出失败".to_string()),
            )
        }
    }
}

/// 当前登录身份，密码散列不参与序列化
#[axum::debug_handler]
pub async fn me(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match state.stores.users.get_by_id(&current.id) {
        Some(user) => (StatusCode::OK, success_to_api_response(user)),
        None => (
            StatusCode::NOT_FOUND,
            error_to_api_response(error_codes::NOT_FOUND, "用户不存在".to_string()),
        ),
    }
}
