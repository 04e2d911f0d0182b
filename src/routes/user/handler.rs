use std::collections::BTreeSet;

use axum::{
    Extension,
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    AppState, catalog,
    middleware::CurrentUser,
    routes::auth::validate_account_fields,
    store::{NewUser, StoreError, UserPatch},
    utils::{error_codes, error_to_api_response, hash_password, success_to_api_response},
};

use super::model::{CreateUserRequest, UpdateUserRequest};

/// 产品集合里的ID必须都在目录中
fn validate_products(products: &BTreeSet<String>) -> Option<String> {
    products
        .iter()
        .find(|id| !catalog::exists(id))
        .map(|id| format!("products 包含未知产品: {}", id))
}

#[axum::debug_handler]
pub async fn list_users(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        success_to_api_response(state.stores.users.list_all()),
    )
}

/// 管理员创建用户，角色和产品集合由请求指定
#[axum::debug_handler]
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> impl IntoResponse {
    if let Some(msg) = validate_account_fields(&req.email, &req.password, &req.name) {
        return (
            StatusCode::BAD_REQUEST,
            error_to_api_response(error_codes::VALIDATION_ERROR, msg),
        );
    }
    let products = req.products.unwrap_or_default();
    if let Some(msg) = validate_products(&products) {
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
        role: req.role,
        products,
    }) {
        Ok(user) => {
            tracing::info!("Admin created user: {}", user.email);
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
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> impl IntoResponse {
    if let Some(email) = &req.email {
        if email.is_empty() || !email.contains('@') {
            return (
                StatusCode::BAD_REQUEST,
                error_to_api_response(error_codes::VALIDATION_ERROR, "email 格式无效".to_string()),
            );
        }
    }
    if let Some(password) = &req.password {
        if password.len() < 6 || password.len() > 64 {
            return (
                StatusCode::BAD_REQUEST,
                error_to_api_response(
                    error_codes::VALIDATION_ERROR,
                    "password 长度必须在6到64个字符之间".to_string(),
                ),
            );
        }
    }
    if let Some(products) = &req.products {
        if let Some(msg) = validate_products(products) {
            return (
                StatusCode::BAD_REQUEST,
                error_to_api_response(error_codes::VALIDATION_ERROR, msg),
            );
        }
    }

    // 重新散列是边界的职责，存储层只接收散列后的值
    let password_hash = match req.password.as_deref().map(hash_password).transpose() {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Failed to hash password: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response(error_codes::INTERNAL_ERROR, "更新用户失败".to_string()),
            );
        }
    };

    match state.stores.users.update(
        &user_id,
        UserPatch {
            email: req.email,
            password_hash,
            name: req.name,
            role: req.role,
            products: req.products,
        },
    ) {
        Ok(user) => (StatusCode::OK, success_to_api_response(user)),
        Err(StoreError::DuplicateEmail(_)) => (
            StatusCode::BAD_REQUEST,
            error_to_api_response(error_codes::EMAIL_EXISTS, "邮箱已被注册".to_string()),
        ),
        Err(StoreError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            error_to_api_response(error_codes::NOT_FOUND, "用户不存在".to_string()),
        ),
    }
}

/// 删除用户，管理员不能删除自己的账号
#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    if user_id == current.id {
        return (
            StatusCode::BAD_REQUEST,
            error_to_api_response(
                error_codes::SELF_DELETE_FORBIDDEN,
                "不能删除自己的账号".to_string(),
            ),
        );
    }

    if state.stores.users.delete(&user_id) {
        tracing::info!("Admin {} deleted user {}", current.email, user_id);
        (
            StatusCode::OK,
            success_to_api_response(serde_json::json!({
                "success": true
            })),
        )
    } else {
        (
            StatusCode::NOT_FOUND,
            error_to_api_response(error_codes::NOT_FOUND, "用户不存在".to_string()),
        )
    }
}
