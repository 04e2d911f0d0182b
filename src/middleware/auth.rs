use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::AppState;
use crate::error::AppError;
use crate::store::Role;

/// 会话解析出的当前身份，注入到请求扩展中
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub session_id: String,
}

/// 认证中间件：Bearer令牌 → redis会话 → 用户记录
///
/// 任一环节缺失都在handler之前以未认证失败
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthenticated)?;

    let session = state
        .sessions
        .get(token)
        .await
        .map_err(|e| {
            tracing::error!("Session lookup failed: {}", e);
            AppError::InternalServerError
        })?
        .ok_or(AppError::Unauthenticated)?;

    // 会话还在但用户已被管理员删除时同样视为未认证
    let user = state
        .stores
        .users
        .get_by_id(&session.user_id)
        .ok_or(AppError::Unauthenticated)?;

    request.extensions_mut().insert(CurrentUser {
        id: user.id,
        email: user.email,
        role: user.role,
        session_id: session.session_id,
    });

    Ok(next.run(request).await)
}

/// 管理员校验，叠加在认证中间件之后
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let current = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::Unauthenticated)?;
    ensure_admin(current)?;
    Ok(next.run(request).await)
}

/// 角色检查本体，数据访问之前执行
pub fn ensure_admin(current: &CurrentUser) -> Result<(), AppError> {
    if current.role == Role::Admin {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}
