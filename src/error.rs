use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::utils::{error_codes, error_to_api_response};

/// 中间件层的请求失败类型，handler 内部的业务错误直接走 error_codes
#[derive(Debug)]
pub enum AppError {
    Unauthenticated,
    Forbidden,
    InternalServerError,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error_message) = match self {
            AppError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                error_codes::AUTH_FAILED,
                "未登录或会话已过期".to_string(),
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                error_codes::PERMISSION_DENIED,
                "需要管理员权限".to_string(),
            ),
            AppError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_codes::INTERNAL_ERROR,
                "内部服务器错误".to_string(),
            ),
        };

        (status, error_to_api_response::<()>(code, error_message)).into_response()
    }
}
