use axum::{
    Extension,
    extract::{Json, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    AppState, catalog,
    middleware::CurrentUser,
    store::SubmissionDraft,
    utils::{error_codes, error_to_api_response, success_to_api_response},
};

use super::model::{SubmissionQuery, UpsertSubmissionRequest};

#[axum::debug_handler]
pub async fn list_submissions(
    State(state): State<AppState>,
    Query(query): Query<SubmissionQuery>,
) -> impl IntoResponse {
    let submissions = match &query.product_id {
        Some(product_id) => state.stores.submissions.list_by_product(
            product_id,
            query.period_type,
            query.period_start,
        ),
        None => state
            .stores
            .submissions
            .list_by_period(query.period_type, query.period_start),
    };

    (StatusCode::OK, success_to_api_response(submissions))
}

/// 提交KPI值，同一 (产品, 字段, 周期起始日) 覆盖写入
///
/// userEmail 不由客户端提供，始终取会话身份
#[axum::debug_handler]
pub async fn upsert_submission(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<UpsertSubmissionRequest>,
) -> impl IntoResponse {
    if !catalog::exists(&req.product_id) {
        return (
            StatusCode::BAD_REQUEST,
            error_to_api_response(
                error_codes::VALIDATION_ERROR,
                format!("productId 不在产品目录中: {}", req.product_id),
            ),
        );
    }
    // 字段名参与键拼接，限制为字母、数字和下划线
    if req.field_name.is_empty()
        || !req
            .field_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return (
            StatusCode::BAD_REQUEST,
            error_to_api_response(
                error_codes::VALIDATION_ERROR,
                "fieldName 只允许使用字母、数字和下划线".to_string(),
            ),
        );
    }
    if req.value.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            error_to_api_response(error_codes::VALIDATION_ERROR, "value 不能为空".to_string()),
        );
    }

    let submission = state.stores.submissions.upsert(SubmissionDraft {
        product_id: req.product_id,
        field_name: req.field_name,
        value: req.value,
        user_email: current.email,
        period_type: req.period_type,
        period_start: req.period_start,
    });

    (StatusCode::OK, success_to_api_response(submission))
}
